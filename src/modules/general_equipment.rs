attribute_module! {
    /// General Equipment Module.
    GeneralEquipmentModule {
        /// Manufacturer.
        manufacturer, set_manufacturer: MANUFACTURER LO Type2;
        /// Institution Name.
        institution_name, set_institution_name: INSTITUTION_NAME LO Type3;
        /// Station Name.
        station_name, set_station_name: STATION_NAME SH Type3;
        /// Manufacturer's Model Name.
        manufacturer_model_name, set_manufacturer_model_name: MANUFACTURER_MODEL_NAME LO Type3;
        /// Device Serial Number.
        device_serial_number, set_device_serial_number: DEVICE_SERIAL_NUMBER LO Type3;
        /// Software Versions.
        software_versions, set_software_versions: SOFTWARE_VERSIONS LO Type3;
    }
}
