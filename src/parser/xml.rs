//! Token XML dump (`<Class>T.xml`), written in debug mode only.

use crate::parser::token::Token;

pub fn tokens_to_xml(tokens: &[Token]) -> String {
    let mut xml = String::from("<tokens>\n");

    for token in tokens {
        let tag = token.category();
        xml.push_str(&format!("<{tag}> {} </{tag}>\n", escape(&token.lexeme())));
    }

    xml.push_str("</tokens>\n");
    xml
}

fn escape(lexeme: &str) -> String {
    lexeme
        .chars()
        .map(|c| match c {
            '<' => String::from("&lt;"),
            '>' => String::from("&gt;"),
            '&' => String::from("&amp;"),
            '"' => String::from("&quot;"),
            c => String::from(c),
        })
        .collect()
}
