//! Registry of the resource types promoted between servers.
//!
//! Each [`ResourceType`] maps to a static [`ResourceDescriptor`] naming its
//! REST endpoint and the element tag used for members of its collection
//! listing. [`MIGRATE_ORDER`] encodes referential dependencies: anything an
//! object can point at is created before the object itself. Cleaning walks the
//! same list backwards.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// A category of manageable object on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
    Buildings,
    Categories,
    ComputerExtensionAttributes,
    Departments,
    Ibeacons,
    MobileDeviceExtensionAttributes,
    PeripheralTypes,
    Printers,
    UserExtensionAttributes,
    LdapServers,
    Packages,
    Scripts,
    Users,
    Computers,
    MobileDevices,
    ComputerGroups,
    MobileDeviceGroups,
    UserGroups,
    Ebooks,
    MacApplications,
    MobileDeviceApplications,
    MobileDeviceConfigurationProfiles,
    NetworkSegments,
    OsXConfigurationProfiles,
    Peripherals,
    Policies,
}

/// Static wiring for one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Snake-case name used in manifests and logs.
    pub name: &'static str,
    /// Path segment below `/JSSResource`.
    pub endpoint: &'static str,
    /// Tag of each member element in the collection listing.
    pub list_element: &'static str,
}

/// Creation order: stand-alone objects, objects pointing at other objects,
/// device and user records, groups, then objects carrying a scope.
pub const MIGRATE_ORDER: [ResourceType; 26] = [
    // Stand-alone objects
    ResourceType::Buildings,
    ResourceType::Categories,
    ResourceType::ComputerExtensionAttributes,
    ResourceType::Departments,
    ResourceType::Ibeacons,
    ResourceType::MobileDeviceExtensionAttributes,
    ResourceType::PeripheralTypes,
    ResourceType::Printers,
    ResourceType::UserExtensionAttributes,
    // Objects that point to other objects
    ResourceType::LdapServers,
    ResourceType::Packages,
    ResourceType::Scripts,
    // Device and user records
    ResourceType::Users,
    ResourceType::Computers,
    ResourceType::MobileDevices,
    // Groups
    ResourceType::ComputerGroups,
    ResourceType::MobileDeviceGroups,
    ResourceType::UserGroups,
    // Objects that have scope
    ResourceType::Ebooks,
    ResourceType::MacApplications,
    ResourceType::MobileDeviceApplications,
    ResourceType::MobileDeviceConfigurationProfiles,
    ResourceType::NetworkSegments,
    ResourceType::OsXConfigurationProfiles,
    ResourceType::Peripherals,
    ResourceType::Policies,
];

/// Deletion order: the exact reverse of [`MIGRATE_ORDER`].
pub fn clean_order() -> impl Iterator<Item = ResourceType> {
    MIGRATE_ORDER.into_iter().rev()
}

impl ResourceType {
    pub fn descriptor(self) -> ResourceDescriptor {
        let (name, endpoint, list_element) = match self {
            ResourceType::Buildings => ("buildings", "buildings", "building"),
            ResourceType::Categories => ("categories", "categories", "category"),
            ResourceType::ComputerExtensionAttributes => (
                "computer_extension_attributes",
                "computerextensionattributes",
                "computer_extension_attribute",
            ),
            ResourceType::Departments => ("departments", "departments", "department"),
            ResourceType::Ibeacons => ("ibeacons", "ibeacons", "ibeacon"),
            ResourceType::MobileDeviceExtensionAttributes => (
                "mobile_device_extension_attributes",
                "mobiledeviceextensionattributes",
                "mobile_device_extension_attribute",
            ),
            ResourceType::PeripheralTypes => {
                ("peripheral_types", "peripheraltypes", "peripheral_type")
            }
            ResourceType::Printers => ("printers", "printers", "printer"),
            ResourceType::UserExtensionAttributes => (
                "user_extension_attributes",
                "userextensionattributes",
                "user_extension_attribute",
            ),
            ResourceType::LdapServers => ("ldap_servers", "ldapservers", "ldap_server"),
            ResourceType::Packages => ("packages", "packages", "package"),
            ResourceType::Scripts => ("scripts", "scripts", "script"),
            ResourceType::Users => ("users", "users", "user"),
            ResourceType::Computers => ("computers", "computers", "computer"),
            ResourceType::MobileDevices => ("mobile_devices", "mobiledevices", "mobile_device"),
            ResourceType::ComputerGroups => ("computer_groups", "computergroups", "computer_group"),
            ResourceType::MobileDeviceGroups => (
                "mobile_device_groups",
                "mobiledevicegroups",
                "mobile_device_group",
            ),
            ResourceType::UserGroups => ("user_groups", "usergroups", "user_group"),
            ResourceType::Ebooks => ("ebooks", "ebooks", "ebook"),
            ResourceType::MacApplications => {
                ("mac_applications", "macapplications", "mac_application")
            }
            ResourceType::MobileDeviceApplications => (
                "mobile_device_applications",
                "mobiledeviceapplications",
                "mobile_device_application",
            ),
            ResourceType::MobileDeviceConfigurationProfiles => (
                "mobile_device_configuration_profiles",
                "mobiledeviceconfigurationprofiles",
                "configuration_profile",
            ),
            ResourceType::NetworkSegments => {
                ("network_segments", "networksegments", "network_segment")
            }
            ResourceType::OsXConfigurationProfiles => (
                "os_x_configuration_profiles",
                "osxconfigurationprofiles",
                "os_x_configuration_profile",
            ),
            ResourceType::Peripherals => ("peripherals", "peripherals", "peripheral"),
            ResourceType::Policies => ("policies", "policies", "policy"),
        };
        ResourceDescriptor {
            name,
            endpoint,
            list_element,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource type '{0}'")]
pub struct UnknownResource(pub String);

impl FromStr for ResourceType {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MIGRATE_ORDER
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}
