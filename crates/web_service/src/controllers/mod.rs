pub mod exam_controller;
pub mod outbound_controller;
pub mod sms_controller;
pub mod voice_controller;
