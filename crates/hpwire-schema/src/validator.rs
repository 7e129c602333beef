use roxmltree::{Document, Node};

use crate::catalog::{ElementSpec, Occurs};
use crate::config::ValidatorConfig;
use crate::error::{Result, SchemaError};

/// Parse `payload` as XML and check it against `schema`.
///
/// Without a schema only well-formedness is checked.
pub(crate) fn check_payload(
    payload: &[u8],
    schema: Option<&ElementSpec>,
    config: &ValidatorConfig,
) -> Result<()> {
    let text = std::str::from_utf8(payload)
        .map_err(|err| SchemaError::InvalidUtf8(err.valid_up_to()))?;
    let doc = Document::parse(text).map_err(|err| SchemaError::Malformed(err.to_string()))?;

    let Some(schema) = schema else {
        return Ok(());
    };

    let root = doc.root_element();
    let found = root.tag_name().name();
    if found != schema.name {
        return Err(SchemaError::UnexpectedRoot {
            expected: schema.name,
            found: found.to_string(),
        });
    }

    check_element(root, schema, config)
}

fn check_element(node: Node<'_, '_>, spec: &ElementSpec, config: &ValidatorConfig) -> Result<()> {
    let element = node.tag_name().name();

    if let Some(missing) = spec
        .attributes
        .iter()
        .find(|attr| attr.required && node.attribute(attr.name).is_none())
    {
        return Err(SchemaError::MissingAttribute {
            element: element.to_string(),
            name: missing.name,
        });
    }

    if config.strict_mode {
        if let Some(unknown) = node
            .attributes()
            .find(|attr| spec.attribute(attr.name()).is_none())
        {
            return Err(SchemaError::UnknownAttribute {
                element: element.to_string(),
                name: unknown.name().to_string(),
            });
        }
    }

    let mut seen = vec![0usize; spec.children.len()];
    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        let Some(index) = spec
            .children
            .iter()
            .position(|candidate| candidate.element.name == name)
        else {
            return Err(SchemaError::UnknownElement {
                parent: element.to_string(),
                name: name.to_string(),
            });
        };

        let child_spec = &spec.children[index];
        seen[index] += 1;
        if seen[index] > 1 && child_spec.occurs != Occurs::Repeated {
            return Err(SchemaError::DuplicateElement {
                parent: element.to_string(),
                name: child_spec.element.name,
            });
        }

        check_element(child, &child_spec.element, config)?;
    }

    if let Some((missing, _)) = spec
        .children
        .iter()
        .zip(&seen)
        .find(|(child, count)| child.occurs == Occurs::Required && **count == 0)
    {
        return Err(SchemaError::MissingElement {
            parent: element.to_string(),
            name: missing.element.name,
        });
    }

    Ok(())
}
