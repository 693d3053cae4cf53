use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Wraps a function in a `tracing` span and records every call and its
/// return value at `trace` level.
///
/// Arguments are forwarded to `#[tracing::instrument]`, e.g.
/// `#[trace_instrument(skip(self))]`.
#[proc_macro_attribute]
pub fn trace_instrument(meta: TokenStream, input: TokenStream) -> TokenStream {
    let meta = proc_macro2::TokenStream::from(meta);
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(input as ItemFn);

    let instrument = if meta.is_empty() {
        quote! { #[::tracing::instrument(ret(level = "trace"))] }
    } else {
        quote! { #[::tracing::instrument(ret(level = "trace"), #meta)] }
    };

    quote! {
        #instrument
        #(#attrs)*
        #vis #sig {
            ::tracing::trace!("call");
            #block
        }
    }
    .into()
}
