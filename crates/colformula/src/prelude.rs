//! Prelude module - common imports for colformula users
//!
//! ```rust
//! use colformula::prelude::*;
//! ```

pub use crate::{
    // Rendering
    render,
    FormulaRenderer,
    Params,
    RenderOutput,
    Syntax,

    // Messages
    I18nMessage,
    UserMessage,

    // Errors
    ParamsError,
    RenderError,

    // Column model
    Series,
    Table,
    Value,
};
