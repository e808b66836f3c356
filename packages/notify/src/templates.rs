// ABOUTME: Plain-text message templates for every outbound mail
// ABOUTME: Each returns (subject, body) for Mailer::send

pub fn otp(code: &str) -> (String, String) {
    (
        "Your verification code".to_string(),
        format!(
            "Your Hemobank verification code is {code}. \
             It expires in 10 minutes. If you did not request this, ignore this mail."
        ),
    )
}

pub fn appointment_approved(donor_name: &str, date: &str) -> (String, String) {
    (
        "Donation appointment approved".to_string(),
        format!(
            "Hi {donor_name},\n\nYour donation appointment on {date} has been approved. \
             Please arrive well rested and hydrated.\n\nThank you for donating!"
        ),
    )
}

pub fn appointment_rejected(donor_name: &str, date: &str) -> (String, String) {
    (
        "Donation appointment update".to_string(),
        format!(
            "Hi {donor_name},\n\nUnfortunately your donation appointment on {date} \
             could not be approved. Please book another slot."
        ),
    )
}

pub fn new_request_alert(
    recipient_name: &str,
    blood_group: &str,
    quantity: i64,
    urgency: &str,
) -> (String, String) {
    (
        format!("New blood request: {quantity} unit(s) of {blood_group}"),
        format!(
            "A new blood request has been submitted.\n\n\
             Recipient: {recipient_name}\n\
             Blood group: {blood_group}\n\
             Quantity: {quantity} unit(s)\n\
             Urgency: {urgency}\n\n\
             Review it from the admin dashboard."
        ),
    )
}
