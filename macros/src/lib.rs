use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, spanned::Spanned, Ident, ItemFn, Stmt};

/// Marks a test function for both native and wasm targets.
///
/// `#[rxsignal_macro::test(virtual_time)]` additionally resets the
/// thread-local `TestScheduler` before the body runs.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let mut input = parse_macro_input!(item as ItemFn);

  if input.sig.asyncness.is_some() {
    return TokenStream::from(
      syn::Error::new(
        input.sig.asyncness.span(),
        "rxsignal_macro::test does not drive async tests. Run futures on a \
         `futures::executor::LocalPool` inside a sync test instead.",
      )
      .to_compile_error(),
    );
  }

  let raw_args = proc_macro2::TokenStream::from(attr);
  let virtual_time = if raw_args.is_empty() {
    false
  } else {
    match syn::parse2::<Ident>(raw_args.clone()) {
      Ok(ident) if ident == "virtual_time" => true,
      _ => {
        return TokenStream::from(
          syn::Error::new(
            raw_args.span(),
            "rxsignal_macro::test only accepts: #[rxsignal_macro::test] or \
             #[rxsignal_macro::test(virtual_time)]",
          )
          .to_compile_error(),
        );
      }
    }
  };

  if virtual_time {
    let init: Stmt = parse_quote!(::rxsignal::scheduler::TestScheduler::init(););
    input.block.stmts.insert(0, init);
  }

  let expanded = quote! {
      #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
      #[cfg_attr(not(target_arch = "wasm32"), test)]
      #input
  };

  TokenStream::from(expanded)
}
