//! Request and response payloads of the platform API.
//!
//! Field names follow the platform's camelCase JSON. Every response embeds
//! [`common::BaseResponse`] inline, as the server does.

pub mod common;
pub mod device_profile;
pub mod event;
pub mod transmission;

pub use common::{BaseRequest, BaseResponse, BaseWithIdResponse, CountResponse};
pub use device_profile::{
    DeviceCommand, DeviceProfile, DeviceProfileRequest, DeviceProfileResponse, DeviceResource,
    DeviceResourceResponse, MultiDeviceProfilesResponse, ResourceOperation, ResourceProperties,
};
pub use event::{
    AddEventRequest, Event, EventCountResponse, EventResponse, MultiEventsResponse, Reading,
    UpdateEventPushedByIdResponse,
};
pub use transmission::{
    Address, MultiTransmissionsResponse, Transmission, TransmissionRecord, TransmissionResponse,
};
