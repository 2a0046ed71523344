//! Cross-module tests exercising the whole pipeline.
