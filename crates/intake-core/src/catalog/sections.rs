//! Built-in intake questionnaire sections.

use super::model::{Question, Section};

pub const PERSONAL_CONFIRMATION: &str = "personal_confirmation";
pub const GOALS_ASSISTANCE: &str = "goals_assistance";
pub const CURRENT_STATUS: &str = "current_status";
pub const IMMIGRATION_HISTORY: &str = "immigration_history";
pub const DEPORTATION_PROCEEDINGS: &str = "deportation_proceedings";
pub const CRIMINAL_HISTORY: &str = "criminal_history";
pub const SPECIAL_CIRCUMSTANCES: &str = "special_circumstances";
pub const FAMILY_INFORMATION: &str = "family_information";
pub const ADDITIONAL_INFORMATION: &str = "additional_information";

const YES_NO: &[&str] = &["Yes", "No"];
const YES_NO_UNSURE: &[&str] = &["Yes", "No", "I don't know"];

/// All sections in display order.
pub fn intake_sections() -> Vec<Section> {
    vec![
        personal_confirmation(),
        goals_and_assistance(),
        current_status(),
        immigration_history(),
        deportation_proceedings(),
        criminal_history(),
        special_circumstances(),
        family_information(),
        additional_information(),
    ]
}

fn personal_confirmation() -> Section {
    Section::new(PERSONAL_CONFIRMATION, "Personal Information")
        .with_description("Please review and update your personal information if needed.")
        .with_questions(vec![
            Question::text("name_first", "First Name"),
            Question::text("name_middle", "Middle Name"),
            Question::text("name_last", "Last Name"),
            Question::date("dob", "Date of Birth"),
            Question::select(
                "birth_country",
                "Country of Birth",
                &["Mexico", "El Salvador", "Guatemala", "Honduras", "Nicaragua", "Other"],
            ),
            Question::select(
                "preferred_language",
                "What is your preferred language?",
                &["English", "Spanish", "Other"],
            ),
            Question::radio("needs_interpreter", "Do you need an interpreter?", YES_NO),
            Question::email("email", "Email Address"),
            Question::phone("phone", "Phone Number"),
            Question::radio(
                "has_a_number",
                "Do you have an Alien Registration Number (A-Number)?",
                YES_NO_UNSURE,
            )
            .with_help(
                "An A-Number is a unique 9-digit identifier assigned by USCIS, found on \
                 documents like a green card or employment authorization card.",
            ),
            Question::text("a_number", "A-Number").shown_when("has_a_number", "Yes"),
        ])
}

fn goals_and_assistance() -> Section {
    Section::new(GOALS_ASSISTANCE, "Client's Goals and Assistance Needed")
        .with_description(
            "This section helps us understand what type of immigration assistance you are seeking.",
        )
        .with_questions(vec![
            Question::checkbox(
                "assistance_purpose",
                "Please select the primary reason(s) why you are seeking immigration assistance",
                &[
                    "\"Fix Papers\" or Get Legal Immigration Status",
                    "Apply for Asylum",
                    "Obtain a Green Card (Lawful Permanent Residence)",
                    "Apply for U.S. Citizenship (Naturalization)",
                    "Determine if You Are Already a U.S. Citizen",
                    "Defend Against Deportation/Removal Proceedings",
                    "Reopen or Appeal a Deportation/Removal Order",
                    "Renew or Extend Current Immigration Status",
                    "Address Pending Criminal Charges Affecting Immigration Status",
                    "Apply for Family-Based Immigration Benefits",
                    "Apply for U Visa or T Visa",
                    "Obtain Work Authorization",
                ],
            )
            .with_help("Select all that apply"),
            Question::long_text("assistance_purpose_other", "Other (Please specify)"),
        ])
}

fn current_status() -> Section {
    Section::new(CURRENT_STATUS, "Current Immigration Status")
        .with_description("Please provide information about your current immigration status.")
        .with_questions(vec![Question::select(
            "current_status",
            "What is your current immigration status?",
            &[
                "U.S. Citizen",
                "Green Card (Lawful Permanent Resident)",
                "Entered with a visa and still in valid status",
                "Entered with a visa but has overstayed (visa expired)",
                "Currently has DACA (Deferred Action for Childhood Arrivals)",
                "Had DACA, but it expired and was not renewed",
                "Currently has Temporary Protected Status (TPS)",
                "Had TPS, but it expired and was not renewed",
                "Currently has Asylee Status (granted asylum)",
                "Currently has U Nonimmigrant Status (U Visa)",
                "Currently has T Nonimmigrant Status (T Visa)",
                "Was granted Parole",
                "Parole expired",
                "Undocumented (never had any legal status in the U.S.)",
                "Other",
                "I don't know",
            ],
        )])
}

fn immigration_history() -> Section {
    Section::new(IMMIGRATION_HISTORY, "Immigration History")
        .with_description("Please provide information about your entries to the United States.")
        .with_questions(vec![Question::select(
            "entry_attempts",
            "How many times have you tried to enter the United States?",
            &["1", "2", "3", "4", "5", "More than 5"],
        )])
}

fn deportation_proceedings() -> Section {
    Section::new(DEPORTATION_PROCEEDINGS, "Deportation or Removal Proceedings")
        .with_description("Please provide information about any deportation or removal proceedings.")
        .with_questions(vec![Question::radio(
            "has_deportation_proceedings",
            "Have you ever been placed in deportation or removal proceedings before an immigration judge?",
            YES_NO_UNSURE,
        )
        .with_help(
            "This refers to cases where you received a Notice to Appear (NTA) and were \
             required to present your case in immigration court.",
        )])
}

fn criminal_history() -> Section {
    Section::new(CRIMINAL_HISTORY, "Criminal History")
        .with_description("Please provide information about any arrests, charges, or convictions.")
        .with_questions(vec![Question::radio(
            "has_criminal_history",
            "Have you ever been arrested, charged, or convicted of a crime or offense in the \
             United States or any other country?",
            YES_NO,
        )])
}

fn special_circumstances() -> Section {
    Section::new(SPECIAL_CIRCUMSTANCES, "Special Circumstances")
        .with_description(
            "This section gathers information about any special situations that may qualify \
             you for certain immigration benefits or reliefs.",
        )
        .with_questions(vec![
            Question::radio(
                "fears_persecution",
                "Do you fear harm or persecution if returned to your home country?",
                YES_NO,
            ),
            Question::radio(
                "victim_of_crime",
                "Have you or any immediate family member ever been the victim of a crime in the U.S.?",
                YES_NO,
            ),
            Question::radio(
                "victim_of_trafficking",
                "Have you ever been a victim of human trafficking in the U.S. or en route to the U.S.?",
                YES_NO,
            ),
            Question::radio(
                "health_problems",
                "Do you or any immediate family members have serious health conditions or disabilities?",
                YES_NO,
            ),
        ])
}

fn family_information() -> Section {
    Section::new(FAMILY_INFORMATION, "Family Information")
        .with_description("This section gathers information about your family relationships.")
        .with_questions(vec![
            Question::select(
                "marital_status",
                "What is your current marital status?",
                &[
                    "Single/Never Married",
                    "Married",
                    "Married but Separated",
                    "Divorced",
                    "Widowed",
                ],
            ),
            Question::radio(
                "serious_relationship",
                "Are you currently in a serious relationship with someone you live with?",
                YES_NO,
            ),
        ])
}

fn additional_information() -> Section {
    Section::new(ADDITIONAL_INFORMATION, "Additional Information")
        .with_description(
            "Please provide any additional information that may be relevant to your case.",
        )
        .with_questions(vec![
            Question::radio(
                "has_deadlines",
                "Do you have any upcoming deadlines or court dates related to your immigration case?",
                YES_NO,
            ),
            Question::long_text(
                "additional_details",
                "Please provide any additional information about your situation or the \
                 assistance you are seeking",
            )
            .with_help(
                "Include any specific concerns, questions, or details that may help us better \
                 understand your needs.",
            ),
        ])
}
