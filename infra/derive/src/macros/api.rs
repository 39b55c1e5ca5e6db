use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

#[derive(Default)]
struct ModelArgs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

/// Serde container settings already written by hand on the struct.
#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    expand_model(args, &input).unwrap_or_else(|err| err.to_compile_error())
}

/// Handlers always carry their `OpenAPI` operation; the unused-async allowance covers
/// handlers that have nothing to await.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[::utoipa::path(#args)]
        #vis #sig #block
    }
}

fn expand_model(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = parse_model_args(args)?;
    let existing = existing_serde(&input.attrs)?;
    let derives = derived_traits(&input.attrs);

    let mut missing = Vec::new();
    if !derives.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        missing.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        missing.push(quote! { ::serde::Deserialize });
    }
    if !derives.contains("ToSchema") {
        missing.push(quote! { ::utoipa::ToSchema });
    }
    let derive_attr = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    let rename = args.rename_all.unwrap_or_else(|| LitStr::new("camelCase", Span::call_site()));
    let rename_attr = match &existing.rename_all {
        Some(current) if current.value() != rename.value() => {
            return Err(syn::Error::new_spanned(
                current,
                "conflicting serde rename_all; remove it or pass the same value to api_model",
            ));
        },
        Some(_) => quote! {},
        None => quote! { #[serde(rename_all = #rename)] },
    };

    let deny = args.deny_unknown_fields.unwrap_or(true);
    let deny_attr = match (existing.deny_unknown_fields, deny) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        },
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote! {},
    };

    Ok(quote! {
        #derive_attr
        #rename_attr
        #deny_attr
        #input
    })
}

fn parse_model_args(args: TokenStream) -> syn::Result<ModelArgs> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut parsed = ModelArgs::default();

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected name-value arguments like `rename_all = \"...\"`",
            ));
        };

        if pair.path.is_ident("rename_all") {
            let value = string_literal(&pair)?;
            if parsed.rename_all.replace(value).is_some() {
                return Err(syn::Error::new_spanned(pair, "duplicate argument"));
            }
        } else if pair.path.is_ident("deny_unknown_fields") {
            let value = bool_literal(&pair)?;
            if parsed.deny_unknown_fields.replace(value).is_some() {
                return Err(syn::Error::new_spanned(pair, "duplicate argument"));
            }
        } else {
            return Err(syn::Error::new_spanned(
                pair.path,
                "unsupported argument; expected rename_all or deny_unknown_fields",
            ));
        }
    }

    Ok(parsed)
}

fn string_literal(pair: &MetaNameValue) -> syn::Result<LitStr> {
    match &pair.value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Str(lit) => Ok(lit.clone()),
            _ => Err(syn::Error::new_spanned(&pair.value, "expected a string literal")),
        },
        _ => Err(syn::Error::new_spanned(&pair.value, "expected a string literal")),
    }
}

fn bool_literal(pair: &MetaNameValue) -> syn::Result<bool> {
    match &pair.value {
        Expr::Lit(expr) => match &expr.lit {
            Lit::Bool(lit) => Ok(lit.value),
            _ => Err(syn::Error::new_spanned(&pair.value, "expected a boolean literal")),
        },
        _ => Err(syn::Error::new_spanned(&pair.value, "expected a boolean literal")),
    }
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut existing = ExistingSerde::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                existing.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                // Skip the value of container attributes this macro does not manage.
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(existing)
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}
