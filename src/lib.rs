pub mod cleanup;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod json;
pub mod resource;
pub mod sandbox;
pub mod scenario;
pub mod template;

pub use error::{HarnessError, HarnessResult};

pub use cleanup::{archive_list, delete_resource, remove_resource};
pub use config::{ApiConfig, Target};
pub use fixtures::{BoardFixture, OrganizationFixture, unique_name};
pub use json::JsonPath;
pub use resource::{BOARDS, CARDS, LISTS, ORGANIZATIONS, RemoteResourceHandle, ResourceKind};
pub use sandbox::Sandbox;
pub use scenario::{Scenario, run_scenario};
pub use template::{ApiRequest, ApiResponse, ContentType, RequestTemplate, RequestTemplateBuilder};

pub use reqwest::{Method, StatusCode};
