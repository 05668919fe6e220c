//! # depwire-derive
//!
//! Procedural macros for the depwire container.
//!
//! - `#[injectable]`: implement `Injectable` from the `#[inject]` constructors
//!   of an inherent impl block

use proc_macro::TokenStream;

mod injectable;

/// Marks an inherent impl block whose `#[inject]` functions construct the type.
///
/// ```ignore
/// #[injectable]
/// impl Mailer {
///     #[inject]
///     fn new(transport: Arc<dyn Transport>) -> Self {
///         Self { transport }
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn injectable(args: TokenStream, input: TokenStream) -> TokenStream {
    injectable::injectable_impl(args, input)
}
