pub mod send_notification;
