//! HTTP service that classifies uploaded brain MRI scans with a pre-trained
//! ONNX model.
pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod preprocess;
