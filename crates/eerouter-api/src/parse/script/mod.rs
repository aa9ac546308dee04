// Smart Hub `cgi_myNetwork.js`
//
// The device list is served as a script declaring
// `var known_device_list = [{mac:'..', hostname:'..', ...}, ...]`. The
// script is parsed properly rather than pattern-matched, since surrounding
// code and formatting vary between firmware releases.

pub mod ast;
pub mod lexer;
pub mod parser;

use self::ast::{Declarator, Expr, Node, Program, walk};
use super::{ParseError, RawRecord, percent_decode};

/// Variable holding the device list in the network-status script.
pub const KNOWN_DEVICE_LIST: &str = "known_device_list";

/// Parse the script and extract one record per object literal in the
/// `known_device_list` initializer.
pub fn parse_known_device_list(script: &str) -> Result<Vec<RawRecord>, ParseError> {
    let program = parser::parse(script)?;
    extract_object_list(&program, KNOWN_DEVICE_LIST)
}

/// Records for every object literal beneath the initializer of the variable
/// `name`, in document order. The last declaration of `name` wins.
pub fn extract_object_list(program: &Program, name: &str) -> Result<Vec<RawRecord>, ParseError> {
    let mut declarator: Option<&Declarator> = None;
    program.walk(|node| {
        if let Node::Declarator(decl) = node {
            if decl.name == name {
                declarator = Some(decl);
            }
        }
    });
    let declarator = declarator.ok_or_else(|| ParseError::ListNotFound(name.to_owned()))?;

    let mut records = Vec::new();
    walk(Node::Declarator(declarator), |node| {
        if let Node::Expr(object @ Expr::Object(_)) = node {
            records.push(collect_properties(object));
        }
    });
    Ok(records)
}

/// Every property assignment in the object's subtree, nested objects
/// included. A repeated key keeps its first position and its last value.
fn collect_properties(object: &Expr) -> RawRecord {
    let mut record = RawRecord::new();
    walk(Node::Expr(object), |node| {
        if let Node::Property(prop) = node {
            record.insert(prop.key.clone(), property_value(&prop.value));
        }
    });
    record
}

/// Literal text of a property value, percent-decoded and with every single
/// quote removed. Non-literal values become the empty string.
fn property_value(value: &Expr) -> String {
    let text = match value {
        Expr::Str { raw, .. } => raw.as_str(),
        Expr::Num(text) | Expr::Ident(text) => text.as_str(),
        _ => "",
    };
    percent_decode(text).replace('\'', "")
}
