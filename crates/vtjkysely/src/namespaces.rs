//! XML namespaces used by the VTJ query service and their preferred prefixes.

/// Web-service types: request/response bodies, `faultCode`, `faultString`.
pub const VTJ_WS: &str = "http://xml.vrk.fi/ws/vtj/vtjkysely/1";

/// Product schema: `VTJHenkiloVastaussanoma` and everything nested inside it.
pub const VTJ_SCHEMA: &str = "http://xml.vrk.fi/schema/vtjkysely";

/// X-Road protocol header elements.
pub const XROAD: &str = "http://x-road.eu/xsd/xroad.xsd";

/// X-Road identifier elements and the `objectType` attribute.
pub const XROAD_IDENTIFIERS: &str = "http://x-road.eu/xsd/identifiers";

/// Reserved namespace bound to the `xml` prefix.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefixes written for known namespaces, in declaration order.
pub const PREFIXES: &[(&str, &str)] = &[
    (VTJ_WS, "vtj"),
    (VTJ_SCHEMA, "vtjkysely"),
    (XROAD, "xrd"),
    (XROAD_IDENTIFIERS, "id"),
];

/// Preferred prefix for a namespace URI, if it is one of the known namespaces.
pub fn preferred_prefix(namespace: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(uri, _)| *uri == namespace)
        .map(|(_, prefix)| *prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_namespaces_have_distinct_prefixes() {
        assert_eq!(preferred_prefix(VTJ_WS), Some("vtj"));
        assert_eq!(preferred_prefix(VTJ_SCHEMA), Some("vtjkysely"));
        assert_eq!(preferred_prefix(XROAD_IDENTIFIERS), Some("id"));
        assert_eq!(preferred_prefix("urn:unknown"), None);

        let mut prefixes: Vec<_> = PREFIXES.iter().map(|(_, p)| *p).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), PREFIXES.len());
    }
}
