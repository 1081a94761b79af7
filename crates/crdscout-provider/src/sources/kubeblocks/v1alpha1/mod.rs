pub mod service_descriptor;
