pub mod google_oauth;
pub mod keyring_service;
pub mod token_cache;
