use darling::util::PathList;
use darling::FromDeriveInput;

/// Parsed attributes from `#[node(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(node), supports(struct_any))]
pub struct NodeArgs {
    pub ident: syn::Ident,
    pub generics: syn::Generics,

    #[darling(default)]
    pub name: Option<String>,

    #[darling(default)]
    pub input: PathList,

    #[darling(default)]
    pub output: PathList,
}

/// Parsed attributes from `#[payload(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(payload))]
pub struct PayloadArgs {
    pub ident: syn::Ident,
    pub generics: syn::Generics,

    #[darling(default)]
    pub name: Option<String>,
}

impl NodeArgs {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.ident.to_string())
    }
}

impl PayloadArgs {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.ident.to_string())
    }
}
