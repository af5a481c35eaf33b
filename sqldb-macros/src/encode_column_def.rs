use crate::decode_column::ColumnMetadata;
use proc_macro2::TokenStream;
use quote::quote;

pub(crate) fn encode_column_def(metadata: &ColumnMetadata) -> TokenStream {
    let name = &metadata.name;
    let field = metadata.ident.to_string();
    let field = field.trim_start_matches("r#");
    let mut result = quote!(::sqldb::ColumnDef::new(#name, #field));
    if metadata.primary_key {
        result = quote!(#result.primary_key());
    }
    if metadata.auto_increment {
        result = quote!(#result.auto_increment());
    }
    if let Some(filter) = &metadata.filter {
        result = quote!(#result.filter(#filter));
    }
    if metadata.descending {
        result = quote!(#result.order(::sqldb::Direction::Desc));
    }
    result
}
