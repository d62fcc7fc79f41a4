pub mod setup_config;
