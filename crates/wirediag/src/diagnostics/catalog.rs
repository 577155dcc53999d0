use super::domain::FaultLabel;

/// Static reference content attached to a ranked diagnosis.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub description: &'static str,
    pub probable_causes: Vec<&'static str>,
    pub recommended_actions: Vec<&'static str>,
    pub wiring_sections: Vec<&'static str>,
}

/// Label-keyed lookup for descriptions, probable causes, recommended
/// actions, and affected wiring sections.
#[derive(Debug, Clone)]
pub struct FaultCatalog {
    entries: Vec<(FaultLabel, CatalogEntry)>,
    fallback: CatalogEntry,
}

impl Default for FaultCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl FaultCatalog {
    pub fn standard() -> Self {
        Self {
            entries: standard_entries(),
            fallback: fallback_entry(),
        }
    }

    /// Lookup never fails; a label missing from the table resolves to a
    /// generic entry rather than dropping the diagnosis.
    pub fn entry(&self, label: FaultLabel) -> &CatalogEntry {
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, entry)| entry)
            .unwrap_or(&self.fallback)
    }
}

fn fallback_entry() -> CatalogEntry {
    CatalogEntry {
        description: "Unclassified electrical fault",
        probable_causes: vec!["Fault pattern not covered by the current catalog"],
        recommended_actions: vec![
            "Perform a full-system electrical inspection",
            "Retrieve and review all stored trouble codes",
        ],
        wiring_sections: vec!["General electrical"],
    }
}

fn standard_entries() -> Vec<(FaultLabel, CatalogEntry)> {
    vec![
        (
            FaultLabel::BatteryCharging,
            CatalogEntry {
                description: "Battery or charging system fault affecting supply voltage",
                probable_causes: vec![
                    "Aged or sulfated battery no longer holding charge",
                    "Failing alternator or voltage regulator",
                    "Corroded or loose battery terminals",
                    "Parasitic drain discharging the battery at rest",
                ],
                recommended_actions: vec![
                    "Load-test the battery and inspect terminal condition",
                    "Measure charging voltage at idle and above 2000 rpm",
                    "Check the alternator belt, wiring, and regulator output",
                    "Run a parasitic draw test with all circuits at rest",
                ],
                wiring_sections: vec![
                    "Battery supply cables",
                    "Alternator output circuit",
                    "Main power distribution",
                ],
            },
        ),
        (
            FaultLabel::GroundCircuit,
            CatalogEntry {
                description: "High-resistance or broken ground path",
                probable_causes: vec![
                    "Corroded chassis ground strap or terminal",
                    "Loose engine-to-body ground connection",
                    "Paint or rust under a ground lug",
                ],
                recommended_actions: vec![
                    "Measure voltage drop across each ground strap under load",
                    "Clean and re-torque chassis and engine ground points",
                    "Replace ground straps reading above specification",
                ],
                wiring_sections: vec![
                    "Chassis ground straps",
                    "Engine ground returns",
                    "Body ground distribution",
                ],
            },
        ),
        (
            FaultLabel::WiringHarness,
            CatalogEntry {
                description: "Damaged or deteriorated wiring harness",
                probable_causes: vec![
                    "Chafed insulation shorting against the body",
                    "Heat-damaged or melted harness sections",
                    "Rodent damage along harness runs",
                    "Vibration-fatigued conductors at connector exits",
                ],
                recommended_actions: vec![
                    "Inspect harness routing for chafe points and heat damage",
                    "Wiggle-test suspect sections while monitoring the circuit",
                    "Repair conductors with sealed splices and re-secure the loom",
                ],
                wiring_sections: vec![
                    "Engine-bay harness",
                    "Body harness runs",
                    "Door and tailgate transitions",
                ],
            },
        ),
        (
            FaultLabel::FuseRelay,
            CatalogEntry {
                description: "Blown fuse or faulty relay in a protected circuit",
                probable_causes: vec![
                    "Overcurrent from a shorted load opening the fuse",
                    "Relay contacts pitted or welded",
                    "Corrosion inside the fuse or relay box",
                ],
                recommended_actions: vec![
                    "Check the affected circuit's fuses and replace open ones",
                    "Swap the suspect relay with a known-good equivalent",
                    "Find and repair the overcurrent cause before re-fusing",
                ],
                wiring_sections: vec![
                    "Underhood fuse and relay box",
                    "Interior fuse panel",
                    "Protected circuit feeds",
                ],
            },
        ),
        (
            FaultLabel::LightingSystem,
            CatalogEntry {
                description: "Exterior or interior lighting circuit fault",
                probable_causes: vec![
                    "Burned-out bulb or failed LED assembly",
                    "Corroded lamp socket or connector",
                    "Faulty lighting switch or dimmer module",
                    "Poor ground at the lamp housing",
                ],
                recommended_actions: vec![
                    "Inspect bulbs and sockets for failure or corrosion",
                    "Verify supply voltage and ground at the lamp connector",
                    "Test the lighting switch and dimmer outputs",
                ],
                wiring_sections: vec![
                    "Headlamp circuits",
                    "Tail and marker lamp circuits",
                    "Interior lighting feeds",
                ],
            },
        ),
        (
            FaultLabel::SwitchControlModule,
            CatalogEntry {
                description: "Faulty switch or electronic control module",
                probable_causes: vec![
                    "Worn switch contacts",
                    "Control module internal failure",
                    "Lost module communication on the data bus",
                    "Connector backout at the module",
                ],
                recommended_actions: vec![
                    "Test switch continuity through its full travel",
                    "Scan for module communication and memory codes",
                    "Verify module power and ground feeds before replacement",
                ],
                wiring_sections: vec![
                    "Switch signal circuits",
                    "Module connector feeds",
                    "Data bus network",
                ],
            },
        ),
        (
            FaultLabel::SensorCircuit,
            CatalogEntry {
                description: "Sensor or sensor wiring circuit fault",
                probable_causes: vec![
                    "Failed sensor element drifting out of range",
                    "Open or shorted sensor signal wire",
                    "Reference voltage fault shared across sensors",
                    "Connector corrosion at the sensor",
                ],
                recommended_actions: vec![
                    "Compare the sensor reading against a known-good value",
                    "Check signal, reference, and ground wiring at the connector",
                    "Replace the sensor only after wiring checks pass",
                ],
                wiring_sections: vec![
                    "Sensor signal circuits",
                    "5V reference distribution",
                    "Sensor ground returns",
                ],
            },
        ),
        (
            FaultLabel::NoFaultDetected,
            CatalogEntry {
                description: "No electrical fault identified from the supplied data",
                probable_causes: vec![
                    "Reported condition not reproducible from the data provided",
                    "Symptom may be intermittent and absent during capture",
                ],
                recommended_actions: vec![
                    "Capture measurements while the symptom is present",
                    "Record trouble codes as soon as the condition recurs",
                ],
                wiring_sections: vec![],
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_has_presentable_content() {
        let catalog = FaultCatalog::standard();
        for label in FaultLabel::ALL {
            let entry = catalog.entry(label);
            assert!(!entry.description.is_empty(), "{label:?} lacks a description");
            assert!(
                !entry.probable_causes.is_empty(),
                "{label:?} lacks probable causes"
            );
            assert!(
                !entry.recommended_actions.is_empty(),
                "{label:?} lacks recommended actions"
            );
        }
    }

    #[test]
    fn lookup_is_keyed_by_label() {
        let catalog = FaultCatalog::standard();
        assert_ne!(
            catalog.entry(FaultLabel::BatteryCharging).description,
            catalog.entry(FaultLabel::GroundCircuit).description
        );
    }
}
