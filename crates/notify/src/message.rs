//! Outbound message shapes and per-transition builders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crewmarket_accounts::{Business, EmailAddress, User};
use crewmarket_jobs::Job;

/// A plain-text outbound email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: EmailAddress,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Sent to the owning business when a crew user applies to one of its jobs.
    pub fn application_submitted(job: &Job, applicant: &User, business: &Business) -> Self {
        Self {
            to: business.contact_email.clone(),
            subject: format!("New application for {}", job.title),
            body: format!(
                "{username} ({email}) has applied for your {title} position ({function}).\n\
                 Review the application in your {business} dashboard.",
                username = applicant.username,
                email = applicant.email,
                title = job.title,
                function = job.job_function,
                business = business.name,
            ),
        }
    }

    /// Sent to a crew user when a business offers them a job.
    pub fn job_offered(crew: &User, business: &Business, job: &Job) -> Self {
        Self {
            to: crew.email.clone(),
            subject: format!("Job offer from {}", business.name),
            body: format!(
                "Hi {username},\n\n{business} has offered you the {title} position ({function}).\n\
                 Log in to respond to the offer.",
                username = crew.username,
                business = business.name,
                title = job.title,
                function = job.job_function,
            ),
        }
    }

    /// Sent to an address invited to join a business.
    pub fn employee_invitation(to: EmailAddress, business: &Business, code: &str) -> Self {
        Self {
            to,
            subject: "Invitation to the Business".to_string(),
            body: format!(
                "You have been invited to {}. Your invitation code is: {code}",
                business.name
            ),
        }
    }
}

/// Short one-time code embedded in invitation emails.
///
/// A random UUID with the hyphens stripped, truncated to 8 characters.
pub fn invitation_code() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    uuid[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewmarket_core::{BusinessId, JobId, UserId};

    fn fixtures() -> (Job, User, Business) {
        let business = Business::new(
            BusinessId::new(),
            "Night Shoot Ltd",
            EmailAddress::parse("booking@nightshoot.example").unwrap(),
        );
        let job = Job::new(JobId::new(), business.id, "Gaffer", "lighting");
        let user = User::new(
            UserId::new(),
            "deckhand",
            EmailAddress::parse("deckhand@kroo.site").unwrap(),
        );
        (job, user, business)
    }

    #[test]
    fn application_mail_goes_to_the_business_contact() {
        let (job, user, business) = fixtures();
        let message = EmailMessage::application_submitted(&job, &user, &business);
        assert_eq!(message.to, business.contact_email);
        assert!(message.subject.contains("Gaffer"));
        assert!(message.body.contains("deckhand"));
    }

    #[test]
    fn offer_mail_goes_to_the_crew_member() {
        let (job, user, business) = fixtures();
        let message = EmailMessage::job_offered(&user, &business, &job);
        assert_eq!(message.to, user.email);
        assert!(message.body.contains("Night Shoot Ltd"));
    }

    #[test]
    fn invitation_codes_are_eight_hex_chars() {
        let code = invitation_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
