
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, ExprLit, Fields, Lit};

struct FieldInfo {
    ident: syn::Ident,
    prop_key: String,
    skip: bool,
}

fn parse_field(f: &syn::Field) -> FieldInfo {
    let ident = f.ident.as_ref().unwrap().clone();
    let mut prop_key = ident.to_string();
    let mut skip = false;

    for attr in &f.attrs {
        if attr.path().is_ident("ogma") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                } else if meta.path.is_ident("prop") {
                    let value = meta.value()?;
                    let expr: Expr = value.parse()?;
                    if let Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) = expr {
                        prop_key = s.value();
                    }
                }
                Ok(())
            });
        }
    }

    FieldInfo { ident, prop_key, skip }
}

fn parse_label(ast: &DeriveInput) -> String {
    let mut label = ast.ident.to_string();
    for attr in &ast.attrs {
        if attr.path().is_ident("ogma") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("label") {
                    let value = meta.value()?;
                    let expr: Expr = value.parse()?;
                    if let Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) = expr {
                        label = s.value();
                    }
                }
                Ok(())
            });
        }
    }
    label
}

pub fn expand(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let label = parse_label(&ast);

    let fields = match &ast.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            _ => {
                return syn::Error::new_spanned(&ast, "IntoGraphValue only supports structs with named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&ast, "IntoGraphValue only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let mut inserts = Vec::new();

    for f in fields {
        let info = parse_field(f);
        if info.skip {
            continue;
        }
        let ident = &info.ident;
        let key = &info.prop_key;
        inserts.push(quote! {
            map.insert(#key.to_string(), ogma_core::value::Value::from(v.#ident));
        });
    }

    let expanded = quote! {
        impl From<#name> for ogma_core::value::Value {
            fn from(v: #name) -> ogma_core::value::Value {
                let mut map = std::collections::BTreeMap::new();
                #(#inserts)*
                ogma_core::value::Value::Map(map)
            }
        }

        impl ogma_core::traits::GraphEntity for #name {
            const LABEL: &'static str = #label;
        }
    };

    expanded.into()
}
