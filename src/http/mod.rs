//! HTTP protocol helpers
//!
//! Response construction shared by every route.

pub mod response;

pub use response::{
    build_404_response, build_405_response, build_500_response, build_health_response,
    build_html_response, build_options_response, body_len, finalize, json_response, strip_body,
    HttpResponse,
};
