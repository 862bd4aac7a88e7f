//! The conversational stages of an outbound script, in call order.

use crate::{AGENT_NAME, COMPANY};
use callgate_types::ContactRecord;

/// One numbered section of the script.
#[derive(Clone, Copy)]
pub struct Stage {
    pub title: &'static str,
    pub render: fn(Option<&ContactRecord>) -> String,
}

pub const STAGES: [Stage; 8] = [
    Stage {
        title: "Introduction",
        render: introduction,
    },
    Stage {
        title: "Equipment",
        render: equipment,
    },
    Stage {
        title: "Work pattern",
        render: work_pattern,
    },
    Stage {
        title: "Dispatcher history",
        render: dispatcher_history,
    },
    Stage {
        title: "How we help",
        render: service_benefits,
    },
    Stage {
        title: "Getting set up",
        render: sign_up,
    },
    Stage {
        title: "Sample load",
        render: sample_load,
    },
    Stage {
        title: "Closing",
        render: closing,
    },
];

fn field<'a>(
    contact: Option<&'a ContactRecord>,
    get: impl Fn(&'a ContactRecord) -> Option<&'a str>,
) -> Option<&'a str> {
    contact.and_then(get)
}

pub fn introduction(contact: Option<&ContactRecord>) -> String {
    match field(contact, |c| c.name.as_deref()) {
        Some(name) => format!(
            "Greet them and confirm who you are speaking with: \"Hi, this is {AGENT_NAME} with {COMPANY}. Am I speaking with someone from {name}?\" If it is the wrong person, ask politely for the owner or whoever handles their loads."
        ),
        None => format!(
            "Greet them and find out who you are speaking with: \"Hi, this is {AGENT_NAME} with {COMPANY}. Who do I have the pleasure of speaking with today?\" Ask for the name of their company as well."
        ),
    }
}

pub fn equipment(contact: Option<&ContactRecord>) -> String {
    match field(contact, |c| c.equipment.as_deref()) {
        Some(equipment) => format!(
            "Our records show they run {equipment} equipment. Confirm that is still accurate and ask whether they have any other trailer types available."
        ),
        None => "Ask what type of equipment they run, for example dry van, reefer, flatbed or step deck, and how many trailers of each.".to_string(),
    }
}

pub fn work_pattern(contact: Option<&ContactRecord>) -> String {
    match contact.and_then(|c| c.driver_count) {
        Some(count) => {
            let drivers = if count == 1 {
                "1 driver".to_string()
            } else {
                format!("{count} drivers")
            };
            format!(
                "Our records list {drivers} on their authority. Ask how many of those trucks are looking for loads right now, which lanes they like to run, and whether they prefer local, regional or over-the-road work."
            )
        }
        None => "Ask how many trucks and drivers they operate, which lanes they like to run, and whether they prefer local, regional or over-the-road work.".to_string(),
    }
}

pub fn dispatcher_history(contact: Option<&ContactRecord>) -> String {
    match field(contact, |c| c.operation.as_deref()) {
        Some(operation) => format!(
            "They are registered for {operation} operations. Ask whether they currently use a dispatcher or book their own loads from load boards, and what they liked or disliked about any dispatch service they used before."
        ),
        None => "Ask what kind of operation they run, interstate or intrastate, for-hire or private. Then ask whether they currently use a dispatcher or book their own loads from load boards, and what they liked or disliked about any dispatch service they used before.".to_string(),
    }
}

pub fn service_benefits(contact: Option<&ContactRecord>) -> String {
    let audience = match field(contact, |c| c.dba_name.as_deref()) {
        Some(dba) => format!("Explain what {COMPANY} would do for {dba}:"),
        None => format!("Explain how {COMPANY} works for owner-operators and small fleets:"),
    };
    format!(
        "{audience}
- We find and book loads that match their equipment and preferred lanes.
- We negotiate rates with brokers so they do not have to.
- We handle carrier packets, rate confirmations and invoicing.
- We charge a flat percentage per load, with no long-term contract."
    )
}

pub fn sign_up(contact: Option<&ContactRecord>) -> String {
    let authority = match field(contact, |c| c.mc_number.as_deref()) {
        Some(mc) => format!("We already have MC/DOT number {mc} on file; confirm it is still active."),
        None => "Ask for their MC or USDOT number.".to_string(),
    };
    let email = match field(contact, |c| c.email.as_deref()) {
        Some(email) => format!("Confirm that the carrier packet can be sent to {email}."),
        None => "Ask for the best email address to send the carrier packet to.".to_string(),
    };
    let fax = match field(contact, |c| c.fax.as_deref()) {
        Some(fax) => format!("If they prefer paper, signed documents can also be faxed from {fax}."),
        None => "Ask whether they have a fax number for signed documents.".to_string(),
    };
    format!(
        "If they are interested, walk them through getting set up. {authority} {email} {fax}
The documents we need are:
- Operating authority letter
- Certificate of insurance
- W-9
- Signed dispatch agreement"
    )
}

pub fn sample_load(contact: Option<&ContactRecord>) -> String {
    let origin = match field(contact, |c| c.address.as_deref()) {
        Some(address) => format!("starting near {address}"),
        None => "starting near a major freight market close to them".to_string(),
    };
    let trailer = match field(contact, |c| c.equipment.as_deref()) {
        Some(equipment) => format!("for their {equipment}"),
        None => "for a dry van".to_string(),
    };
    format!(
        "To make it concrete, describe a typical load {origin} {trailer}: pickup and delivery cities, miles, and the rate we would aim to negotiate. Make clear it is an illustration, not a booked load."
    )
}

pub fn closing(contact: Option<&ContactRecord>) -> String {
    match field(contact, |c| c.name.as_deref()) {
        Some(name) => format!(
            "Thank them for their time on behalf of {COMPANY}, confirm the next step for {name}, and tell them a team member will follow up within 24 hours."
        ),
        None => format!(
            "Thank the caller for their time on behalf of {COMPANY}, confirm the next step, and tell them a team member will follow up within 24 hours."
        ),
    }
}
