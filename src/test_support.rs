//! Fixtures shared by unit tests.

use crate::domain::{
    Admission, CampusLocation, Catalog, Course, Event, Faq, FaqCategory, QuickAction,
};
use chrono::{DateTime, Utc};

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// Small catalog. Records are deliberately not in key order.
pub fn sample_catalog() -> Catalog {
    Catalog {
        admissions: vec![
            Admission {
                id: 1,
                program_name: "Computer Science BSc".into(),
                application_deadline: at("2026-03-01T00:00:00Z"),
                requirements: "High school diploma, SAT 1200+".into(),
                contact_email: "cs-admissions@university.edu".into(),
                application_link: "https://apply.university.edu/cs".into(),
            },
            Admission {
                id: 2,
                program_name: "Mechanical Engineering BEng".into(),
                application_deadline: at("2026-01-10T00:00:00Z"),
                requirements: "Physics and calculus".into(),
                contact_email: "eng-admissions@university.edu".into(),
                application_link: "https://apply.university.edu/meng".into(),
            },
        ],
        courses: vec![
            Course {
                id: 1,
                code: "CS-101".into(),
                title: "Introduction to Programming".into(),
                description: "Fundamentals of programming in Python".into(),
                credits: 3,
                department: Some("Computer Science".into()),
                prerequisites: None,
            },
            Course {
                id: 2,
                code: "CS-201".into(),
                title: "Data Structures".into(),
                description: "Lists, trees and graphs".into(),
                credits: 4,
                department: Some("Computer Science".into()),
                prerequisites: Some("CS-101".into()),
            },
        ],
        events: vec![
            Event {
                id: 1,
                title: "Career Fair".into(),
                date: at("2025-09-15T10:00:00Z"),
                location: "Gymnasium".into(),
                description: "Meet employers".into(),
                registration_link: "https://events.university.edu/careers".into(),
            },
            Event {
                id: 2,
                title: "Spring Festival".into(),
                date: at("2025-06-01T09:00:00Z"),
                location: "Main Quad".into(),
                description: "Music and food".into(),
                registration_link: "https://events.university.edu/spring".into(),
            },
            Event {
                id: 3,
                title: "Winter Gala".into(),
                date: at("2024-12-20T19:00:00Z"),
                location: "Great Hall".into(),
                description: "Formal dinner".into(),
                registration_link: "https://events.university.edu/gala".into(),
            },
        ],
        faqs: vec![
            Faq {
                id: 1,
                question: "Can transfer students apply?".into(),
                answer: "Transfer students apply through the same portal.".into(),
                category: FaqCategory::Admissions,
                keywords: "Transfer, apply, credits".into(),
            },
            Faq {
                id: 2,
                question: "What aid is available?".into(),
                answer: "Scholarships and grants are listed on the aid portal.".into(),
                category: FaqCategory::FinancialAid,
                keywords: "scholarship, grant".into(),
            },
            Faq {
                id: 3,
                question: "I forgot my password".into(),
                answer: "Reset your password at https://it.university.edu.".into(),
                category: FaqCategory::TechnicalSupport,
                keywords: "password, login".into(),
            },
            Faq {
                id: 4,
                question: "When is campus open?".into(),
                answer: "The campus is open 7am-11pm.".into(),
                category: FaqCategory::GeneralInquiry,
                keywords: "hours, opening".into(),
            },
            Faq {
                id: 5,
                question: "Where do freshmen live?".into(),
                answer: "First-year students live in North Hall.".into(),
                category: FaqCategory::Housing,
                keywords: "dorm".into(),
            },
        ],
        locations: vec![
            CampusLocation {
                id: 1,
                building_name: "Science Hall".into(),
                room_number: "S-105".into(),
                department: Some("Physics".into()),
                description: Some("Labs and lecture rooms".into()),
                map_image_url: Some("https://maps.university.edu/science.png".into()),
            },
            CampusLocation {
                id: 2,
                building_name: "Harper Building".into(),
                room_number: "H-100".into(),
                department: None,
                description: Some("Main Library, study rooms".into()),
                map_image_url: Some("https://maps.university.edu/harper.png".into()),
            },
        ],
        quick_actions: vec![
            QuickAction {
                action_id: "view-grades".into(),
                response_text: "Here are your current grades: ...".into(),
            },
            QuickAction {
                action_id: "class-schedule".into(),
                response_text: "Here is your class schedule: ...".into(),
            },
        ],
    }
}
