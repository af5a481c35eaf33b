mod decode_column;
mod decode_table;
mod encode_column_def;

use decode_column::decode_column;
use decode_table::decode_table;
use encode_column_def::encode_column_def;
use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Implements `sqldb::Record`.
///
/// ```rust,ignore
/// #[derive(Record)]
/// #[sqldb(name = "user")]
/// struct User {
///     #[sqldb(primary_key, auto_increment)]
///     id: u64,
///     #[sqldb(name = "user_name", filter = "like")]
///     name: String,
///     #[sqldb(flatten)]
///     audit: Audit,
///     cache: Vec<u8>, // not mapped
/// }
/// ```
#[proc_macro_derive(Record, attributes(sqldb))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let name = &item.ident;
    if !item.generics.params.is_empty() {
        panic!("Record cannot be derived for the generic struct `{}`", name);
    }
    let table_name = match decode_table(&item) {
        Some(v) => quote!(Some(#v)),
        None => quote!(None),
    };
    let columns: Vec<_> = item.fields.iter().filter_map(decode_column).collect();
    let columns_defs = columns.iter().map(|c| {
        if c.flatten {
            let ty = &c.ty;
            quote!(columns.extend_from_slice(<#ty as ::sqldb::Record>::column_defs());)
        } else {
            let def = encode_column_def(c);
            quote!(columns.push(#def);)
        }
    });
    let values = columns.iter().map(|c| {
        let field = &c.ident;
        if c.flatten {
            quote!(values.extend(::sqldb::Record::values(&self.#field));)
        } else {
            quote!(values.push(::sqldb::AsValue::as_value(
                ::std::clone::Clone::clone(&self.#field)
            ));)
        }
    });
    let assign = columns.iter().map(|c| {
        let field = &c.ident;
        if c.flatten {
            let ty = &c.ty;
            quote! {
                let len = <#ty as ::sqldb::Record>::column_defs().len();
                if index < offset + len {
                    return ::sqldb::Record::assign(&mut self.#field, index - offset, value);
                }
                offset += len;
            }
        } else {
            quote! {
                if index == offset {
                    self.#field = ::sqldb::AsValue::try_from_value(value)?;
                    return Ok(());
                }
                offset += 1;
            }
        }
    });
    quote! {
        impl ::sqldb::Record for #name {
            fn table_name(&self) -> Option<&'static str> {
                #table_name
            }

            fn column_defs() -> &'static [::sqldb::ColumnDef] {
                static RESULT: ::std::sync::LazyLock<Box<[::sqldb::ColumnDef]>> =
                    ::std::sync::LazyLock::new(|| {
                        let mut columns = Vec::new();
                        #(#columns_defs)*
                        columns.into_boxed_slice()
                    });
                &RESULT
            }

            fn columns(&self) -> &'static [::sqldb::ColumnDef] {
                <Self as ::sqldb::Record>::column_defs()
            }

            fn values(&self) -> Vec<::sqldb::Value> {
                let mut values = Vec::with_capacity(<Self as ::sqldb::Record>::column_defs().len());
                #(#values)*
                values
            }

            #[allow(unused_assignments, unused_mut)]
            fn assign(&mut self, index: usize, value: ::sqldb::Value) -> ::sqldb::Result<()> {
                let mut offset = 0usize;
                #(#assign)*
                Err(::sqldb::Error::msg(format!(
                    "Column index {} is out of range for {}",
                    index,
                    ::std::any::type_name::<Self>(),
                )))
            }
        }
    }
    .into()
}
