use uuid::Uuid;

use crate::modules::simulations::core::views::SimulationDetail;
use crate::modules::simulations::errors::SimulationsError;
use crate::modules::simulations::service::SimulationsService;

impl SimulationsService {
    pub async fn get_simulation(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
    ) -> Result<SimulationDetail, SimulationsError> {
        let simulation = self.owned(simulation_id, user_id).await?;
        let subdivisions = self.simulations.subdivisions(simulation.id).await?;
        Ok(SimulationDetail {
            summary: simulation.into(),
            subdivisions,
        })
    }
}

#[cfg(test)]
mod get_simulation_handler_tests {
    use uuid::Uuid;

    use crate::modules::simulations::errors::SimulationsError;
    use crate::tests::fixtures::lakes::seed_lake;
    use crate::tests::fixtures::simulations::make_simulations_service;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_return_the_owned_simulation() {
        let fixture = make_simulations_service();
        let seeded = seed_lake(&fixture.catalog, &fixture.store, "Lago").await;
        let owner = Uuid::now_v7();
        let simulation = fixture
            .service
            .create_simulation(owner, seeded.lake_id, "Plan", None)
            .await
            .unwrap();

        let detail = fixture.service.get_simulation(simulation.id, owner).await.unwrap();
        assert_eq!(detail.summary.id, simulation.id);
        assert!(detail.subdivisions.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn other_users_should_be_forbidden() {
        let fixture = make_simulations_service();
        let seeded = seed_lake(&fixture.catalog, &fixture.store, "Lago").await;
        let simulation = fixture
            .service
            .create_simulation(Uuid::now_v7(), seeded.lake_id, "Plan", None)
            .await
            .unwrap();

        let result = fixture.service.get_simulation(simulation.id, Uuid::now_v7()).await;
        assert!(matches!(result, Err(SimulationsError::Forbidden)));
    }

    #[rstest]
    #[tokio::test]
    async fn an_unknown_simulation_should_not_be_found() {
        let fixture = make_simulations_service();
        let result = fixture
            .service
            .get_simulation(Uuid::now_v7(), Uuid::now_v7())
            .await;
        assert!(matches!(result, Err(SimulationsError::SimulationNotFound(_))));
    }
}
