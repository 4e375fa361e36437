mod repository;

pub use repository::ProviderConfigRepository;
