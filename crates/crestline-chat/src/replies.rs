//! Canned and templated replies produced without the model.

use chrono_tz::Tz;

use crestline_core::config::CompanyConfig;
use crestline_core::types::{EntityKind, NormalizedEntity};

/// The contact-details reply, with an Arabic variant.
pub fn contact_reply(company: &CompanyConfig, user_language: &str) -> String {
    match user_language {
        "ar" => format!(
            "يمكنك الاتصال بنا عبر الهاتف أو الواتساب على الرقم: {}\nأو عبر البريد الإلكتروني: {}",
            company.phone, company.email
        ),
        _ => format!(
            "You can contact us by phone or WhatsApp at {}.\nOr by email: {}",
            company.phone, company.email
        ),
    }
}

/// The ownership reply (pivot language; the pipeline translates it).
pub fn ownership_reply(company: &CompanyConfig) -> String {
    format!("{} Founded and owned by {}.", company.blurb, company.owner)
}

/// The company-info context reply.
pub fn company_info_reply(sections: &[String], company: &CompanyConfig) -> String {
    if sections.is_empty() {
        format!("Company information: {}", company.blurb)
    } else {
        format!("Company information:\n{}", sections.join("\n"))
    }
}

/// The canned local-time reply in the agency's timezone.
pub fn time_reply(company: &CompanyConfig) -> String {
    let now = chrono::Utc::now();
    let local = match company.timezone.parse::<Tz>() {
        Ok(tz) => now.with_timezone(&tz).format("%I:%M %p").to_string(),
        Err(_) => now.format("%I:%M %p").to_string(),
    };
    format!("The current time is {} in {}.", local, company.city)
}

/// The assistant-identity reply.
pub fn identity_reply(company: &CompanyConfig) -> String {
    format!(
        "I am {}. How can I assist you with your real estate inquiries today?",
        company.agent_name
    )
}

/// Acknowledgement of a declared name.
pub fn name_declared_reply(name: &str) -> String {
    format!(
        "Nice to meet you, {}. How can I assist you with your real estate inquiries today?",
        name
    )
}

/// Answer to "what's my name" when a name is remembered.
pub fn name_known_reply(name: &str) -> String {
    format!("Your name is {}.", name)
}

/// Answer to "what's my name" when nothing is remembered.
pub fn name_unknown_reply() -> &'static str {
    "I don't know your name yet. What should I call you?"
}

/// Lead-in line for a populated list reply, by kind.
fn list_lead_in(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Product => "Available products include:",
        EntityKind::Project => "Available projects include:",
        EntityKind::Developer => "Our partner developers include:",
        EntityKind::User => "Users include:",
    }
}

/// Render a populated list reply.
///
/// Arabic replies use the bare numbered format; other languages get the
/// English lead-in line.
pub fn list_reply(kind: EntityKind, entities: &[NormalizedEntity], user_language: &str) -> String {
    let body = entities
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}: {}", i + 1, e.name, e.description))
        .collect::<Vec<_>>()
        .join("\n");
    if user_language == "ar" {
        body
    } else {
        format!("{}\n{}", list_lead_in(kind), body)
    }
}

/// The fixed apology for an empty collection, with an Arabic variant.
pub fn empty_list_reply(kind: EntityKind, user_language: &str) -> String {
    if user_language == "ar" {
        let noun = match kind {
            EntityKind::Product => "العقارات",
            EntityKind::Project => "المشاريع",
            EntityKind::Developer => "المطورين",
            EntityKind::User => "المستخدمين",
        };
        format!(
            "عذرًا، لا توجد تفاصيل عن {} في الوقت الحالي. يرجى الاتصال بنا للحصول على معلومات محدثة.",
            noun
        )
    } else {
        format!(
            "I'm sorry, but I don't have specific details about {}s at the moment. Please contact us directly for updated and accurate information.",
            kind.label()
        )
    }
}

/// Canned best-of responses per kind.
pub fn best_of_reply(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Project => {
            "The best projects in Dubai include Dubai Marina, Downtown Dubai, and Palm Jumeirah. \
             These areas are known for their luxury and high-quality developments."
        }
        EntityKind::Product => {
            "The best products in Dubai include luxury villas in Emirates Hills, apartments in \
             Burj Khalifa, and waterfront residences in Jumeirah Beach Residence."
        }
        EntityKind::Developer => {
            "The best developers in Dubai include Emaar, Nakheel, and DAMAC, known for their \
             iconic and high-quality developments."
        }
        EntityKind::User => "",
    }
}

/// The pricing contact line appended to model replies.
pub fn pricing_contact_line(company: &CompanyConfig) -> String {
    format!(
        "For pricing or payment details, you can share this contact: Mobile: {} (WhatsApp) | Email: {}",
        company.phone, company.email
    )
}

/// The location-availability line, with an Arabic variant.
pub fn location_availability_line(company: &CompanyConfig, user_language: &str) -> String {
    match user_language {
        "ar" => format!(
            "يمكنك الاستفسار عن توافر العقارات والمشاريع في {} من خلال الاتصال بنا على {} أو زيارة موقعنا {}.",
            company.city, company.phone, company.website
        ),
        _ => format!(
            "You can inquire about product and project availability in {} by contacting us at {} or visiting our website {}.",
            company.city, company.phone, company.website
        ),
    }
}

// =============================================================================
// Tests
// =============================================================================
