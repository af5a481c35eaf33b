use quote::ToTokens;
use syn::{ItemStruct, LitStr, parse::ParseBuffer};

/// Relation name from `#[sqldb(name = "...")]` on the struct, `None` when absent.
pub(crate) fn decode_table(item: &ItemStruct) -> Option<String> {
    let mut result = None;
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("sqldb") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `sqldb`, use it like: `#[sqldb(name = \"my_table\")]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `name`, use it like: `#[sqldb(name = \"my_table\")]`"
                    );
                };
                result = Some(v.value());
            } else {
                panic!(
                    "Unknown attribute `{}` inside sqldb macro on a struct",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    result
}
