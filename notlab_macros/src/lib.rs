use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, ReturnType, Type};

fn formatted_arg_error_msg(arg_name: &str, arg_pos: usize, fn_name: &str) -> String {
    format!(
        "Expected argument {} ('{}') of builtin {} to be f64",
        arg_pos, arg_name, fn_name
    )
}

fn is_f64(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.path.is_ident("f64"))
}

/// Turns `fn name(a: f64, ..) -> f64 { .. }` into an upper-case
/// `crate::functions::Builtin` constant. The generated `call` checks the
/// argument count when the expression is evaluated, then binds the
/// positional arguments and runs the body.
#[proc_macro_attribute]
pub fn builtin_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    match expand_builtin(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand_builtin(input: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;
    let fn_body = &input.block;
    let fn_attrs = &input.attrs;
    let fn_vis = &input.vis;
    let name_str = fn_name.to_string();
    let const_name = format_ident!("{}", name_str.to_uppercase());

    match &input.sig.output {
        ReturnType::Type(_, ty) if is_f64(ty) => {}
        output => {
            return Err(syn::Error::new(
                output.span(),
                format!("builtin {} must return f64", name_str),
            ))
        }
    }

    let mut arg_bindings = Vec::new();

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new(arg.span(), "builtins cannot take self"));
        };

        let arg_name = match **pat {
            syn::Pat::Ident(ref ident) => &ident.ident,
            _ => return Err(syn::Error::new(pat.span(), "Unsupported pattern")),
        };

        if !is_f64(ty) {
            return Err(syn::Error::new(
                ty.span(),
                formatted_arg_error_msg(&arg_name.to_string(), i, &name_str),
            ));
        }

        arg_bindings.push(quote! {
            let #arg_name: f64 = args[#i];
        });
    }

    let arity = arg_bindings.len();

    Ok(quote! {
        #(#fn_attrs)*
        #fn_vis const #const_name: crate::functions::Builtin = {
            fn call(args: &[f64]) -> ::std::result::Result<f64, crate::error::EvaluationError> {
                if args.len() != #arity {
                    return Err(crate::error::EvaluationError::ArityMismatch {
                        function: #name_str.to_string(),
                        expected: #arity,
                        found: args.len(),
                    });
                }

                #(#arg_bindings)*

                Ok(#fn_body)
            }

            crate::functions::Builtin {
                name: #name_str,
                arity: #arity,
                call,
            }
        };
    })
}
