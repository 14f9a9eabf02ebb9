use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::mailer::{InlineImage, MailError, Mailer, OutboundMail};

pub const FEEDBACK_SUBJECT: &str = "Feedback from Contact Form";
pub const THANK_YOU_SUBJECT: &str = "Thank You for Your Feedback!";
pub const THANK_YOU_IMAGE_CID: &str = "thankyou-image";

/// Contact form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct Feedback {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("failed to forward feedback: {0}")]
    Forward(#[source] MailError),

    #[error("failed to send thank-you mail: {0}")]
    ThankYou(#[source] MailError),
}

/// Forwards feedback to the owner's inbox, then thanks the sender.
#[derive(Clone)]
pub struct FeedbackNotifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    inbox: String,
    thank_you_image: Option<InlineImage>,
}

impl FeedbackNotifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, inbox: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            inbox: inbox.into(),
            thank_you_image: None,
        }
    }

    /// Embed `image` below the thank-you text.
    pub fn with_thank_you_image(mut self, image: InlineImage) -> Self {
        self.thank_you_image = Some(image);
        self
    }

    /// Sends both messages in order. The thank-you mail is skipped when forwarding fails.
    pub async fn submit(&self, feedback: &Feedback) -> Result<(), FeedbackError> {
        self.mailer
            .send(self.forward_mail(feedback))
            .await
            .map_err(FeedbackError::Forward)?;

        self.mailer
            .send(self.thank_you_mail(feedback))
            .await
            .map_err(FeedbackError::ThankYou)
    }

    fn forward_mail(&self, feedback: &Feedback) -> OutboundMail {
        OutboundMail {
            from: self.from.clone(),
            to: self.inbox.clone(),
            subject: FEEDBACK_SUBJECT.to_string(),
            body: format!(
                "Name: {}\nEmail: {}\nMessage: {}",
                feedback.name, feedback.email, feedback.message
            ),
            html: false,
            inline_images: Vec::new(),
        }
    }

    fn thank_you_mail(&self, feedback: &Feedback) -> OutboundMail {
        let mut body = format!(
            "Thank you for your feedback, {}! We appreciate your time.",
            escape_html(&feedback.name)
        );
        let inline_images = match &self.thank_you_image {
            Some(image) => {
                body.push_str(&format!("<br><img src=\"cid:{}\" alt=\"Thank you\">", image.content_id));
                vec![image.clone()]
            }
            None => Vec::new(),
        };

        OutboundMail {
            from: self.from.clone(),
            to: feedback.email.clone(),
            subject: THANK_YOU_SUBJECT.to_string(),
            body,
            html: true,
            inline_images,
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<OutboundMail>>,
        fail_on: Option<usize>,
    }

    #[async_trait]
    impl Mailer for Recorder {
        async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
            let mut sent = self.sent.lock().await;
            if self.fail_on == Some(sent.len()) {
                return Err(MailError::InvalidEndpoint("down".into()));
            }
            sent.push(mail);
            Ok(())
        }
    }

    fn feedback() -> Feedback {
        Feedback {
            name: "Aiko <3".into(),
            email: "aiko@example.com".into(),
            message: "Love the linen line".into(),
        }
    }

    #[tokio::test]
    async fn forwards_then_thanks() {
        let recorder = Arc::new(Recorder::default());
        let notifier = FeedbackNotifier::new(recorder.clone(), "shop@example.com", "owner@example.com");

        notifier.submit(&feedback()).await.unwrap();

        let sent = recorder.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].subject, FEEDBACK_SUBJECT);
        assert_eq!(
            sent[0].body,
            "Name: Aiko <3\nEmail: aiko@example.com\nMessage: Love the linen line"
        );
        assert_eq!(sent[1].to, "aiko@example.com");
        assert!(sent[1].html);
        assert!(sent[1].body.contains("Aiko &lt;3"));
        assert!(sent[0].inline_images.is_empty());
        assert!(sent[1].inline_images.is_empty());
    }

    #[tokio::test]
    async fn thank_you_embeds_configured_image() {
        let recorder = Arc::new(Recorder::default());
        let image = InlineImage::png(THANK_YOU_IMAGE_CID, &[0x89, b'P', b'N', b'G']);
        let notifier = FeedbackNotifier::new(recorder.clone(), "shop@example.com", "owner@example.com")
            .with_thank_you_image(image.clone());

        notifier.submit(&feedback()).await.unwrap();

        let sent = recorder.sent.lock().await;
        assert!(sent[0].inline_images.is_empty());
        assert_eq!(sent[1].inline_images, vec![image]);
        assert!(sent[1].body.contains("cid:thankyou-image"));
    }

    #[tokio::test]
    async fn forward_failure_skips_thank_you() {
        let recorder = Arc::new(Recorder { fail_on: Some(0), ..Default::default() });
        let notifier = FeedbackNotifier::new(recorder.clone(), "shop@example.com", "owner@example.com");

        let err = notifier.submit(&feedback()).await.unwrap_err();
        assert!(matches!(err, FeedbackError::Forward(_)));
        assert!(recorder.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn thank_you_failure_is_reported() {
        let recorder = Arc::new(Recorder { fail_on: Some(1), ..Default::default() });
        let notifier = FeedbackNotifier::new(recorder.clone(), "shop@example.com", "owner@example.com");

        let err = notifier.submit(&feedback()).await.unwrap_err();
        assert!(matches!(err, FeedbackError::ThankYou(_)));
        assert_eq!(recorder.sent.lock().await.len(), 1);
    }
}
