pub mod shared {
    pub mod core {
        pub mod errors;
        pub mod extract;
        pub mod responses;
        pub mod security;
    }
    pub mod infrastructure {
        pub mod object_store;
        pub mod postgres;
        pub mod repository;
    }
}

pub mod modules {
    pub mod users {
        pub mod core {
            pub mod ports;
            pub mod session;
            pub mod user;
        }
        pub mod errors;
        pub mod service;
        pub mod use_cases {
            pub mod sign_up {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod sign_in {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod refresh_session {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod log_out {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod current_user {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod inbound {
                pub mod current_user;
            }
            pub mod outbound {
                pub mod in_memory;
                pub mod postgres;
            }
        }
    }

    pub mod lakes {
        pub mod core {
            pub mod bitset;
            pub mod crs;
            pub mod geometry;
            pub mod grid;
            pub mod lake;
            pub mod ports;
            pub mod raster;
            pub mod rasterize;
            pub mod selection;
            pub mod stats;
            pub mod views;
        }
        pub mod errors;
        pub mod service;
        pub mod use_cases {
            pub mod list_lakes {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod get_lake {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod layer_stats {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod blocked_mask {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod assess_selection {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod in_memory;
                pub mod postgres;
            }
        }
    }

    pub mod simulations {
        pub mod core {
            pub mod ports;
            pub mod simulation;
            pub mod views;
        }
        pub mod errors;
        pub mod service;
        pub mod use_cases {
            pub mod create_simulation {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod list_simulations {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod get_simulation {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod manage_subdivisions {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod finalize_simulation {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
            pub mod simulation_runs {
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod in_memory;
                pub mod postgres;
            }
        }
    }
}

pub mod shell;
