use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod node_meta;
use node_meta::{parse_node_info, parse_params};

/// Registers a stage type with the gesturelab stage registry.
///
/// The struct must implement `Default` and `Stage`. Every field tagged with
/// `#[param(...)]` is exported as a parameter schema.
#[proc_macro_derive(StageNode, attributes(node_meta, param))]
pub fn derive_stage_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let node_info = match parse_node_info(&input) {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let fields = match parse_params(&input) {
        Ok(fields) => fields,
        Err(e) => return e.write_errors().into(),
    };

    let struct_name = &input.ident;
    let node_id = struct_name.to_string().to_lowercase();
    let node_name = &node_info.name;
    let category = &node_info.category;

    let params = fields.iter().filter_map(|f| {
        let field_name = f.ident.as_ref()?.to_string();
        let default_val = f.default.clone().unwrap_or_else(|| "null".to_string());
        let type_name = extract_type_name(&f.ty);

        let min = match f.min {
            Some(min) => quote! { Some(#min) },
            None => quote! { None },
        };
        let max = match f.max {
            Some(max) => quote! { Some(#max) },
            None => quote! { None },
        };

        Some(quote! {
            crate::registry::ParameterSchema {
                name: #field_name.to_string(),
                param_type: #type_name.to_string(),
                default: ::serde_json::from_str(#default_val)
                    .unwrap_or_else(|_| ::serde_json::Value::String(#default_val.to_string())),
                min: #min,
                max: #max,
            }
        })
    });

    let mod_name = syn::Ident::new(
        &format!("__stage_registration_{}", node_id),
        struct_name.span(),
    );

    let factory_fn_name = syn::Ident::new(
        &format!("create_metadata_{}", node_id),
        struct_name.span(),
    );

    let expanded = quote! {
        #[doc(hidden)]
        mod #mod_name {
            use super::*;

            fn #factory_fn_name() -> crate::registry::StageMetadata {
                crate::registry::StageMetadata {
                    id: #node_id.to_string(),
                    name: #node_name.to_string(),
                    category: #category.to_string(),
                    parameters: vec![#(#params),*],
                    factory: || Box::new(#struct_name::default()),
                }
            }

            ::inventory::submit! {
                crate::registry::StageMetadataFactoryWrapper(#factory_fn_name)
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_type_name(ty: &syn::Type) -> &'static str {
    let type_str = quote!(#ty).to_string();

    if type_str.contains("Vec") {
        "array"
    } else if type_str.contains("f64") || type_str.contains("f32") {
        "number"
    } else if type_str.contains("u32") || type_str.contains("i32")
        || type_str.contains("u64") || type_str.contains("i64")
        || type_str.contains("usize") || type_str.contains("isize") {
        "number"
    } else if type_str.contains("String") || type_str.contains("str") {
        "string"
    } else if type_str.contains("bool") {
        "boolean"
    } else {
        "unknown"
    }
}
