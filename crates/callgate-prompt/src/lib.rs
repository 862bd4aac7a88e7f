//! Conversation scripts for the voice agent.
//!
//! A script is a persona preamble followed by a fixed, numbered sequence of
//! conversational [`Stage`]s. Each stage is a pure function of the optional
//! contact record and chooses, field by field, between a personalized line
//! (the field is known) and a generic line (it is not). Fields are
//! independent: any subset of a record may be populated.

pub mod stages;

pub use stages::{Stage, STAGES};

use callgate_types::ContactRecord;

/// Name the agent introduces itself with.
pub const AGENT_NAME: &str = "Steve";
/// Company the agent represents.
pub const COMPANY: &str = "Knolabs Dispatch";

/// Script used when no per-call script is composed.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Your name is Steve and you're answering calls on behalf of Knolabs Dispatch, a truck dispatching service for owner-operators and small fleets.

Greet the caller warmly, introduce yourself as a dispatcher with Knolabs Dispatch and ask how you can help them today.

If they ask about the service, explain that Knolabs Dispatch:
- Finds and books loads that match their equipment and preferred lanes
- Negotiates rates with brokers on their behalf
- Handles carrier packets, rate confirmations and invoicing paperwork
- Charges a flat percentage of each load with no long-term contract

Focus on:
- Understanding their equipment and the lanes they like to run
- Gathering their MC or USDOT number and the best email for paperwork
- Being professional, friendly and concise

Remember to collect their contact details for follow-up if they show interest.";

/// Which side of the call the agent is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Persona {
    /// The agent placed the call.
    Outbound,
    /// The agent is answering a call.
    Inbound,
}

fn preamble(persona: Persona) -> String {
    let role = match persona {
        Persona::Outbound => format!(
            "Your name is {AGENT_NAME} and you are an outbound dispatcher calling on behalf of {COMPANY}, a truck dispatching service that finds loads, negotiates rates and handles paperwork for owner-operators and small fleets."
        ),
        Persona::Inbound => format!(
            "Your name is {AGENT_NAME} and you're answering calls on behalf of {COMPANY}, a truck dispatching service that finds loads, negotiates rates and handles paperwork for owner-operators and small fleets.

Greet the caller warmly and introduce yourself as a dispatcher with {COMPANY}. Ask how you can assist them today. If they are interested in the service, use the stages below to guide the conversation."
        ),
    };
    format!(
        "{role}

Speak naturally and keep each turn short. Ask one question at a time and wait for the answer. If the person is busy, offer to call back at a better time. Never invent details you were not given.

Work through the following stages in order:"
    )
}

fn closing_guidelines() -> &'static str {
    "If at any point they are not interested, thank them politely and end the call. Never pressure them."
}

fn render(
    persona: Persona,
    context: Option<String>,
    contact: Option<&ContactRecord>,
    reminder: Option<String>,
) -> String {
    let mut script = preamble(persona);
    script.push_str("\n\n");

    if let Some(context) = context {
        script.push_str(&context);
        script.push_str("\n\n");
    }

    for (number, stage) in STAGES.iter().enumerate() {
        script.push_str(&format!(
            "{}. {}\n{}\n\n",
            number + 1,
            stage.title,
            (stage.render)(contact)
        ));
    }

    script.push_str(closing_guidelines());
    if let Some(reminder) = reminder {
        script.push_str("\n\n");
        script.push_str(&reminder);
    }
    script
}

/// Builds the outbound script for `contact`, or the generic script for an
/// unknown contact.
pub fn compose(contact: Option<&ContactRecord>) -> String {
    render(Persona::Outbound, None, contact, None)
}

/// One line listing everything on file for a known caller, with sentinels
/// standing in for absent fields.
fn record_summary(contact: &ContactRecord) -> String {
    format!(
        "- On file for this number: name {}, DBA {}, MC/DOT {}, address {}, fax {}, email {}, operation {}, drivers {}, equipment {}. Treat these as unconfirmed.",
        contact.name_or_default(),
        contact.dba_name_or_default(),
        contact.mc_number_or_default(),
        contact.address_or_default(),
        contact.fax_or_default(),
        contact.email_or_default(),
        contact.operation_or_default(),
        contact.driver_count_or_default(),
        contact.equipment_or_default(),
    )
}

/// Builds the script for an inbound call.
///
/// The caller's claimed number is passed through to the agent as context.
/// It is not verified; the agent is told to confirm it before relying on it.
pub fn compose_inbound(caller_number: &str, contact: Option<&ContactRecord>) -> String {
    let caller_number = caller_number.trim();
    if caller_number.is_empty() {
        return render(Persona::Inbound, None, contact, None);
    }

    let mut context = format!(
        "IMPORTANT CONTEXT:
- The caller's phone number is: {caller_number}
- You already have this number, so if they request a callback or follow-up, you can say \"I can see you're calling from {caller_number}, shall I use this number for the follow-up?\" Always get a confirmation before moving forward. Don't assume it's their number!"
    );
    if let Some(contact) = contact {
        context.push('\n');
        context.push_str(&record_summary(contact));
    }

    let reminder = format!(
        "Remember: You already have their contact number ({caller_number}), so you can focus on gathering other relevant information for the follow-up."
    );
    render(Persona::Inbound, Some(context), contact, Some(reminder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_numbered_in_order() {
        let script = compose(None);

        let mut last = 0;
        for (number, stage) in STAGES.iter().enumerate() {
            let heading = format!("{}. {}\n", number + 1, stage.title);
            let at = script.find(&heading).expect("stage heading present");
            assert!(at > last, "stage {} out of order", stage.title);
            last = at;
        }
    }

    #[test]
    fn compose_is_deterministic() {
        let record = ContactRecord::builder("+15551112222")
            .name(Some("Acme"))
            .build();
        assert_eq!(compose(Some(&record)), compose(Some(&record)));
    }

    #[test]
    fn inbound_script_carries_caller_number() {
        let script = compose_inbound("+15553334444", None);

        assert!(script.contains("The caller's phone number is: +15553334444"));
        assert!(script.contains("I can see you're calling from +15553334444"));
    }

    #[test]
    fn inbound_script_without_caller_skips_context() {
        let script = compose_inbound("  ", None);

        assert!(!script.contains("IMPORTANT CONTEXT"));
        assert!(!script.contains("Remember: You already have their contact number"));
        assert!(script.contains("you're answering calls on behalf of Knolabs Dispatch"));
    }

    #[test]
    fn inbound_script_answers_instead_of_calling() {
        let script = compose_inbound("+15553334444", None);

        assert!(!script.contains("outbound dispatcher calling"));
        assert!(script.contains("you're answering calls on behalf of Knolabs Dispatch"));
        assert!(script.contains("Ask how you can assist them today."));
        assert!(script.ends_with(
            "Remember: You already have their contact number (+15553334444), so you can focus on gathering other relevant information for the follow-up."
        ));
    }

    #[test]
    fn outbound_script_keeps_dispatcher_persona() {
        let script = compose(None);

        assert!(script.contains("outbound dispatcher calling on behalf of Knolabs Dispatch"));
        assert!(!script.contains("answering calls"));
        assert!(!script.contains("Remember: You already have their contact number"));
    }

    #[test]
    fn inbound_script_lists_record_on_file_with_sentinels() {
        let record = ContactRecord::builder("+15553334444")
            .name(Some("Acme"))
            .driver_count(Some(4))
            .build();
        let script = compose_inbound("+15553334444", Some(&record));

        assert!(script.contains("- On file for this number: name Acme, DBA Unknown, MC/DOT Unknown, address No address provided, fax No fax provided, email No email provided, operation Unknown, drivers 4, equipment Unknown."));
    }

    #[test]
    fn inbound_script_for_unknown_caller_has_no_record_line() {
        let script = compose_inbound("+15553334444", None);
        assert!(!script.contains("On file for this number"));
    }
}
