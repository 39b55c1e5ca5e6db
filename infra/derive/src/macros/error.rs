use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Field, Fields, FieldsNamed, GenericArgument, Ident,
    PathArguments, Type, Variant,
};

/// What the expansion needs to know about one enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    cfg: Vec<Attribute>,
}

impl ErrorVariant<'_> {
    fn is_internal(&self) -> bool {
        self.ident == "Internal"
    }
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "crwa_error can only be applied to enums")
            .to_compile_error();
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        match ErrorVariant::parse(variant) {
            Ok(parsed) => variants.push(parsed),
            Err(err) => return err.to_compile_error(),
        }
    }

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let derives = missing_derives(&input.attrs);
    let context_trait = context_trait(name, &ext, &variants);
    let source_impls = variants.iter().filter(|v| !v.is_internal()).filter_map(|v| source_impl(name, &ext, v));
    let message_impls = variants.iter().find(|v| v.is_internal()).map(|v| message_impls(name, v));

    quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#source_impls)*
        #message_impls

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            match context {
                Some(c) => std::borrow::Cow::Owned(format!(" ({c})")),
                None => std::borrow::Cow::Borrowed(""),
            }
        }
    }
}

impl<'a> ErrorVariant<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "crwa_error variants must use named fields (`source`, `message`, `context`)",
            ));
        };

        let has_context = context_field(fields)?.is_some();
        let source = fields.named.iter().find(|field| is_source(field));

        if source.is_some() && !has_context {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "crwa_error variants with a source need `context: Option<Cow<'static, str>>`",
            ));
        }

        Ok(Self {
            ident: &variant.ident,
            source,
            has_context,
            cfg: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).cloned().collect(),
        })
    }
}

fn context_field(fields: &FieldsNamed) -> syn::Result<Option<&Field>> {
    let Some(field) = fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == "context"))
    else {
        return Ok(None);
    };
    if is_optional_static_cow(&field.ty) {
        Ok(Some(field))
    } else {
        Err(syn::Error::new_spanned(&field.ty, "context field must be Option<Cow<'static, str>>"))
    }
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

fn missing_derives(attrs: &[Attribute]) -> TokenStream {
    let present = derived_traits(attrs);
    let mut missing = Vec::new();
    if !present.contains("Debug") {
        missing.push(quote! { Debug });
    }
    if !present.contains("Error") {
        missing.push(quote! { ::thiserror::Error });
    }
    if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } }
}

fn context_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let ident = v.ident;
        let cfg = &v.cfg;
        quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #(#arms)*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

fn source_impl(name: &Ident, ext: &Ident, variant: &ErrorVariant<'_>) -> Option<TokenStream> {
    let field = variant.source?;
    let field_ident = field.ident.as_ref()?;
    let ty = &field.ty;
    let ident = variant.ident;
    let cfg = &variant.cfg;

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field_ident: #ty) -> Self {
                Self::#ident { #field_ident, context: None }
            }
        }

        #(#cfg)*
        #[automatically_derived]
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field_ident| #name::#ident { #field_ident, context: Some(context.into()) })
            }
        }
    })
}

fn message_impls(name: &Ident, internal: &ErrorVariant<'_>) -> TokenStream {
    let cfg = &internal.cfg;
    quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::Internal { message: std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::Internal { message: std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
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

/// Matches `Option<Cow<'static, str>>`, with or without a path prefix on either type.
fn is_optional_static_cow(ty: &Type) -> bool {
    let Some(cow) = single_type_argument(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = cow else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };

    let mut args = args.args.iter();
    let static_lifetime =
        matches!(args.next(), Some(GenericArgument::Lifetime(lt)) if lt.ident == "static");
    let str_type = matches!(
        args.next(),
        Some(GenericArgument::Type(Type::Path(p))) if p.path.segments.last().is_some_and(|s| s.ident == "str")
    );

    static_lifetime && str_type && args.next().is_none()
}

fn single_type_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
