use chrono::Utc;
use uuid::Uuid;

use crate::modules::simulations::core::simulation::SimulationRun;
use crate::modules::simulations::errors::SimulationsError;
use crate::modules::simulations::service::SimulationsService;

impl SimulationsService {
    /// Freezes the current aggregates of a simulation into a run.
    pub async fn create_run(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
    ) -> Result<SimulationRun, SimulationsError> {
        let simulation = self.owned(simulation_id, user_id).await?;
        let subdivisions = self.simulations.subdivisions(simulation_id).await?;
        let run = simulation.run(&subdivisions, Utc::now())?;
        self.runs.insert_run(run.clone()).await?;
        tracing::info!(
            run_id = %run.id,
            %simulation_id,
            total_inhabitants = run.total_inhabitants,
            "simulation run completed"
        );
        Ok(run)
    }

    pub async fn get_run(
        &self,
        run_id: Uuid,
        user_id: Uuid,
    ) -> Result<SimulationRun, SimulationsError> {
        let run = self
            .runs
            .get_run(run_id)
            .await?
            .ok_or(SimulationsError::RunNotFound(run_id))?;
        if run.user_id != user_id {
            return Err(SimulationsError::Forbidden);
        }
        Ok(run)
    }
}

#[cfg(test)]
mod simulation_runs_handler_tests {
    use uuid::Uuid;

    use crate::modules::simulations::core::simulation::SubdivisionInput;
    use crate::modules::simulations::errors::SimulationsError;
    use crate::tests::fixtures::lakes::{cells_polygon, seed_lake};
    use crate::tests::fixtures::simulations::make_simulations_service;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_snapshot_the_aggregates() {
        let fixture = make_simulations_service();
        let seeded = seed_lake(&fixture.catalog, &fixture.store, "Lago").await;
        let user_id = Uuid::now_v7();
        let service = &fixture.service;
        let simulation = service
            .create_simulation(user_id, seeded.lake_id, "Plan", None)
            .await
            .unwrap();
        let subdivisions = [
            (cells_polygon(&seeded.grid, 1, 1, 0, 2), 100, 0.5),
            (cells_polygon(&seeded.grid, 2, 2, 0, 1), 10, 1.0),
        ];
        for (geometry, inhabitants, impact_factor) in subdivisions {
            let input = SubdivisionInput {
                dataset_version_id: None,
                geometry,
                geometry_crs: "EPSG:3857".into(),
                all_touched: false,
                inhabitants,
                impact_factor,
            };
            service.add_subdivision(simulation.id, user_id, &input).await.unwrap();
        }

        let run = service.create_run(simulation.id, user_id).await.unwrap();
        assert_eq!(run.subdivision_count, 2);
        assert_eq!(run.total_selected_cells, 5);
        assert_eq!(run.total_inhabitants, 110);
        assert!((run.weighted_impact - 60.0).abs() < 1e-9);

        let fetched = service.get_run(run.id, user_id).await.unwrap();
        assert_eq!(fetched, run);
    }

    #[rstest]
    #[tokio::test]
    async fn runs_should_be_private_to_their_owner() {
        let fixture = make_simulations_service();
        let seeded = seed_lake(&fixture.catalog, &fixture.store, "Lago").await;
        let user_id = Uuid::now_v7();
        let simulation = fixture
            .service
            .create_simulation(user_id, seeded.lake_id, "Plan", None)
            .await
            .unwrap();
        let run = fixture.service.create_run(simulation.id, user_id).await.unwrap();

        let result = fixture.service.get_run(run.id, Uuid::now_v7()).await;
        assert!(matches!(result, Err(SimulationsError::Forbidden)));
        let missing = fixture.service.get_run(Uuid::now_v7(), user_id).await;
        assert!(matches!(missing, Err(SimulationsError::RunNotFound(_))));
    }
}
