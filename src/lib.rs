//! Smart Resource Allocation
//!
//! A terminal dashboard over the resource-management, employee information
//! and AI matching services. Resource requests and employees are fetched,
//! paginated and filtered for display; a request's lines can be sent to the
//! matching service for ranked staffing suggestions.

pub mod domain;
pub use domain::Config;

pub mod api;
pub use api::{EmployeeClient, InsiderClient, MatchClient};

pub mod view;
pub use view::{EmployeeList, RequestDetailView, RequestList};
