mod dispatch_service;

pub use dispatch_service::{DispatchService, DOMAIN_PAGE_SIZE};
