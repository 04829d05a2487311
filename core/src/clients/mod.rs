//! One client per API resource family.

pub mod device_profile;
pub mod event;
pub mod transmission;

pub use device_profile::DeviceProfileClient;
pub use event::EventClient;
pub use transmission::TransmissionClient;
