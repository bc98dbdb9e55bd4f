use crate::domain::models::notification::{ActivationEmail, EmailTemplateName};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

pub fn render(email: &ActivationEmail) -> RenderedEmail {
    match email.template {
        EmailTemplateName::ActivateAccount => render_activate_account(email),
    }
}

fn render_activate_account(email: &ActivationEmail) -> RenderedEmail {
    let name = escape_html(&email.recipient_name);
    let url = escape_html(&email.activation_url);
    let code = escape_html(&email.activation_code);

    let html = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"UTF-8\"><title>{subject}</title></head>\n\
         <body>\n\
         <p>Hello {name},</p>\n\
         <p>Your account has been created. Use the code below to activate it:</p>\n\
         <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{code}</p>\n\
         <p><a href=\"{url}\">Activate your account</a></p>\n\
         <p>The code expires in 15 minutes.</p>\n\
         </body>\n\
         </html>\n",
        subject = escape_html(&email.subject),
    );

    let text = format!(
        "Hello {},\n\nYour account has been created. Use the code below to activate it:\n\n{}\n\n{}\n\nThe code expires in 15 minutes.\n",
        email.recipient_name, email.activation_code, email.activation_url,
    );

    RenderedEmail { html, text }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
