pub mod batch;
pub mod constants;
pub mod earth_orientation;
pub mod eop;
pub mod estimator;
pub mod kernel;
pub mod params;
pub mod posangle;
pub mod posangle_errors;
pub mod ref_system;
pub mod site;
pub mod time;
pub mod transform;
