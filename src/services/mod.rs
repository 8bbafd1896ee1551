pub mod translation_state;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogEntry, CatalogError, CatalogQuery, CatalogService, VideoDetail};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod identity_service;
pub mod identity_service_impl;
pub use identity_service::{IdentityError, IdentityService, OauthAssertion, OauthInfo};
pub use identity_service_impl::SeaOrmIdentityService;

pub mod import_service;
pub mod import_service_impl;
pub use import_service::{ImportError, ImportOutcome, ImportRow, ImportService};
pub use import_service_impl::DefaultImportService;

pub mod authz;
pub use authz::{Action, Authorizer, Decision, RoleAuthorizer};
