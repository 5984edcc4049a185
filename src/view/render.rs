use order_service::{LineItem, Order};

use super::format::{format_amount, format_date};
use super::{
    EMPTY_MESSAGE, HEADING, LOADING_MESSAGE, MALFORMED_MESSAGE, MalformedPayloadDisplay,
    RenderOptions, ViewState,
};

/// Display tree produced by [`render`]. Plain data, so two renders of the same
/// state compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub class: Option<&'static str>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn element(tag: &'static str, class: Option<&'static str>, children: Vec<Self>) -> Self {
        Self::Element(Element {
            tag,
            class,
            children,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// All text in document order, without separators.
    pub fn text_content(&self) -> String {
        let mut content = String::new();
        self.collect_text(&mut content);
        content
    }

    fn collect_text(&self, content: &mut String) {
        match self {
            Self::Text(text) => content.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(content);
                }
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, html: &mut String) {
        match self {
            Self::Text(text) => push_escaped(html, text),
            Self::Element(element) => {
                html.push('<');
                html.push_str(element.tag);
                if let Some(class) = element.class {
                    html.push_str(" class=\"");
                    html.push_str(class);
                    html.push('"');
                }
                html.push('>');
                for child in &element.children {
                    child.write_html(html);
                }
                html.push_str("</");
                html.push_str(element.tag);
                html.push('>');
            }
        }
    }

    /// Terminal rendering: one line per text-bearing element, list items
    /// prefixed with `- `.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_lines(&mut lines);

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn collect_lines(&self, lines: &mut Vec<String>) {
        match self {
            Self::Text(text) => lines.push(text.clone()),
            Self::Element(element) if element.is_leaf() => {
                let content = self.text_content();
                if content.is_empty() {
                    return;
                }
                if element.tag == "li" {
                    lines.push(format!("  - {content}"));
                } else {
                    lines.push(content);
                }
            }
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_lines(lines);
                }
            }
        }
    }
}

impl Element {
    fn is_leaf(&self) -> bool {
        self.children
            .iter()
            .all(|child| matches!(child, Node::Text(_)))
    }
}

fn push_escaped(html: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            _ => html.push(c),
        }
    }
}

/// Pick the displayed branch: loading, then error, then records.
pub fn render(state: &ViewState, options: &RenderOptions) -> Node {
    if state.is_loading() {
        return placeholder(LOADING_MESSAGE);
    }

    if let Some(message) = state.error_message() {
        return error_banner(message);
    }

    match state {
        ViewState::MalformedPayload => match options.malformed_payload {
            MalformedPayloadDisplay::Empty => placeholder(EMPTY_MESSAGE),
            MalformedPayloadDisplay::Error => error_banner(MALFORMED_MESSAGE),
        },
        ViewState::Loaded(orders) if !orders.is_empty() => order_list(orders, options),
        _ => placeholder(EMPTY_MESSAGE),
    }
}

fn placeholder(message: &str) -> Node {
    Node::element(
        "div",
        Some("text-center py-10"),
        vec![Node::element(
            "h2",
            Some("text-2xl font-bold text-gray-800"),
            vec![Node::text(message)],
        )],
    )
}

fn error_banner(message: &str) -> Node {
    Node::element(
        "div",
        Some("text-center py-10 text-red-600 font-semibold"),
        vec![Node::text(message)],
    )
}

fn order_list(orders: &[Order], options: &RenderOptions) -> Node {
    let cards = orders
        .iter()
        .map(|order| order_card(order, options))
        .collect();

    Node::element(
        "div",
        Some("min-h-screen bg-gradient-to-br from-indigo-50 to-blue-100 text-gray-900"),
        vec![Node::element(
            "div",
            Some("max-w-4xl mx-auto px-6 py-16"),
            vec![
                Node::element(
                    "h1",
                    Some("text-4xl font-bold text-center mb-10"),
                    vec![Node::text(HEADING)],
                ),
                Node::element("div", Some("space-y-8"), cards),
            ],
        )],
    )
}

fn order_card(order: &Order, options: &RenderOptions) -> Node {
    let detail = |text: String| Node::element("p", Some("text-gray-600"), vec![Node::text(text)]);

    let items = order
        .items
        .iter()
        .map(|item| line_item(item, options))
        .collect();

    Node::element(
        "div",
        Some("bg-white shadow-lg rounded-xl p-6 space-y-4"),
        vec![
            Node::element(
                "h2",
                Some("text-2xl font-semibold"),
                vec![Node::text(format!("Order ID: {}", order.order_id))],
            ),
            detail(format!(
                "Date: {}",
                format_date(&order.created_at, options.timezone, &options.date_format)
            )),
            detail(format!(
                "Total: {}",
                format_amount(order.total_amount, &options.currency_symbol)
            )),
            detail(format!("Status: {}", order.status)),
            detail(format!("Delivery Address: {}", order.delivery_address)),
            Node::element(
                "div",
                Some("text-gray-600"),
                vec![
                    Node::element("h3", Some("font-semibold"), vec![Node::text("Items:")]),
                    Node::element("ul", None, items),
                ],
            ),
        ],
    )
}

fn line_item(item: &LineItem, options: &RenderOptions) -> Node {
    Node::element(
        "li",
        None,
        vec![Node::text(format!(
            "{} - {}",
            item.name,
            format_amount(item.price, &options.currency_symbol)
        ))],
    )
}
