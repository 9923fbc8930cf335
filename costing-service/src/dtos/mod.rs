pub mod clients;
pub mod costs;
pub mod systems;

pub use clients::{ClientRequest, ClientResponse};
pub use costs::{CostListParams, CostListResponse, CostResponse, CostSubmission, NewCostRequest};
pub use systems::{SystemRequest, SystemResponse};
