use crate::ast::{Node, NodeData, NodeRef};

const INDENT: &str = "  ";

/// Serialize a node and its descendants.
///
/// The output is normalized rather than raw-preserving: two-space indentation,
/// one node per line, `prop: value;` declarations. A root ends with a newline
/// unless it is empty.
pub fn stringify(node: &NodeRef) -> String {
  let mut out = String::new();
  if node.borrow().is_root() {
    for child in Node::children(node) {
      write_node(&mut out, &child, 0);
      out.push('\n');
    }
  } else {
    write_node(&mut out, node, 0);
  }
  out
}

fn write_node(out: &mut String, node: &NodeRef, depth: usize) {
  let inner = node.borrow();
  let indent = INDENT.repeat(depth);

  match &inner.data {
    NodeData::Root => {
      for (index, child) in inner.nodes.iter().enumerate() {
        if index > 0 {
          out.push('\n');
        }
        write_node(out, child, depth);
      }
    }
    NodeData::Comment(data) => {
      out.push_str(&indent);
      out.push_str("/*");
      out.push_str(&data.left);
      out.push_str(&data.text);
      out.push_str(&data.right);
      out.push_str("*/");
    }
    NodeData::Declaration(data) => {
      out.push_str(&indent);
      out.push_str(&data.prop);
      out.push_str(": ");
      out.push_str(&data.value);
      if data.important {
        out.push_str(" !important");
      }
      out.push(';');
    }
    NodeData::Rule(data) => {
      write_block(out, &data.selector, &inner.nodes, &indent, depth);
    }
    NodeData::AtRule(data) => {
      let header = if data.params.is_empty() {
        format!("@{}", data.name)
      } else {
        format!("@{} {}", data.name, data.params)
      };

      if !data.has_block && inner.nodes.is_empty() {
        out.push_str(&indent);
        out.push_str(&header);
        out.push(';');
      } else {
        write_block(out, &header, &inner.nodes, &indent, depth);
      }
    }
  }
}

fn write_block(out: &mut String, header: &str, children: &[NodeRef], indent: &str, depth: usize) {
  out.push_str(indent);
  out.push_str(header);

  if children.is_empty() {
    out.push_str(" {}");
    return;
  }

  out.push_str(" {\n");
  for child in children {
    write_node(out, child, depth + 1);
    out.push('\n');
  }
  out.push_str(indent);
  out.push('}');
}
