//! Domain types, decision procedures, and use-case services.
//!
//! Two pure procedures sit at the centre:
//! - [`visible_actions`] decides what each role sees on the dashboard.
//! - [`validate_and_stage`] turns submitted files into staged documents and
//!   per-field errors.
//!
//! Everything that touches the data API or the object store goes through the
//! traits in [`ports`].

pub mod access;
pub mod admin_login_service;
pub mod auth;
pub mod communications;
pub mod communications_service;
pub mod document_update_service;
pub mod documents;
pub mod error;
pub mod framework;
pub mod ports;
pub mod reports;
pub mod role;
pub mod service;
pub mod upload;
pub mod user;
pub mod visibility;

pub use self::access::Gate;
pub use self::admin_login_service::AdminLoginService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::communications::{CommunicationField, Flash, COMMUNICATION_FIELDS};
pub use self::communications_service::CommunicationsService;
pub use self::document_update_service::{DocumentStorage, DocumentUpdateService, UPDATE_REASON};
pub use self::documents::{
    DocumentErrorKind, DocumentField, DocumentOutcome, ExistingDocuments, SERVICE_DOCUMENT_FIELDS,
    StagedDocument, StagingContext, validate_and_stage,
};
pub use self::error::{Error, ErrorCode};
pub use self::framework::{Framework, FrameworkStatus, REPORTS_AFTER_EXPIRY_SLUG};
pub use self::reports::{SupplierReport, buyer_csv, research_frameworks};
pub use self::role::{Role, UnknownRole};
pub use self::service::{Service, ServiceId, ServicePatch};
pub use self::upload::{FileFormat, Upload, UploadSet};
pub use self::user::{AccountAction, AdminUser, SupplierRef, UserAccount};
pub use self::visibility::{
    Dashboard, FrameworkAction, FrameworkPanel, GlobalLink, Header, VisibleAction, VisibleHeader,
    VisibleLink, visible_actions,
};
