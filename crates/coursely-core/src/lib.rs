// coursely-core: Course cache and session state between coursely-api and consumers (CLI).

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthContext, Identity, MemoryTokenStore, Session, TOKEN_KEY, TokenStore};
pub use config::{ClientConfig, DEFAULT_API_URL, TlsVerification};
pub use error::{CoreError, GatewayFailure};
pub use model::{Category, Course, CourseDraft, CourseId, CoursePatch, Level};
pub use normalize::{normalize, normalize_all};
pub use store::{CourseStore, Lifecycle, OperationKind, Phase};
pub use stream::{CourseSnapshot, CourseStream, CourseWatchStream};
