//! Transcript-to-video synthesis pipeline.
//!
//! This crate provides:
//! - Service seams for language, image, speech and upload collaborators
//! - HTTP clients for Gemini, Imagen, Cloud Text-to-Speech and R2 uploads
//! - The pipeline stages (summarize, segment, align, render, narrate,
//!   caption, compose, assemble)
//! - Per-run transient resource tracking with guaranteed cleanup
//! - The controller that sequences a run through its state machine

pub mod aligner;
pub mod assembler;
pub mod captions;
pub mod clients;
pub mod composer;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod narrator;
pub mod responses;
pub mod retry;
pub mod segmenter;
pub mod services;
pub mod summarizer;
pub mod tracker;
pub mod visuals;

pub use config::PipelineConfig;
pub use controller::{Pipeline, PipelineRun, PipelineServices, RunOutcome};
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use services::{
    ArtifactUploader, ImageGenerationParams, ImageGenerator, LanguageModel, ServiceError,
    ServiceResult, SpeechSynthesizer,
};
pub use tracker::ResourceTracker;
