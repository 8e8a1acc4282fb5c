use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::spanned::Spanned;

/// Widest contract the runtime implements `Contract` and `Contains` for.
pub const MAX_CONTRACT_WIDTH: usize = 6;

/// Sorts payload paths by their final segment and drops repeats, so that two
/// declarations naming the same set of types expand to the same tuple type.
pub fn canonicalize(paths: &[syn::Path]) -> syn::Result<Vec<syn::Path>> {
    let mut keyed: Vec<(String, String, syn::Path)> = paths
        .iter()
        .map(|path| {
            let last = path
                .segments
                .last()
                .map(|segment| segment.ident.to_string())
                .unwrap_or_default();
            (last, path.to_token_stream().to_string(), path.clone())
        })
        .collect();

    keyed.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
    keyed.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);

    if keyed.len() > MAX_CONTRACT_WIDTH {
        let extra = &keyed[MAX_CONTRACT_WIDTH].2;
        return Err(syn::Error::new(
            extra.span(),
            format!("a contract holds at most {MAX_CONTRACT_WIDTH} payload types"),
        ));
    }

    Ok(keyed.into_iter().map(|(_, _, path)| path).collect())
}

/// Renders canonical paths as the tuple type used for type-level contracts.
pub fn tuple(paths: &[syn::Path]) -> TokenStream {
    quote! { ( #( #paths, )* ) }
}
