/*!
scenarios.rs - End-to-end scan-cycle scenarios exercising `LadCompiler`
and `Runtime` together (spec.md §8 S1-S6).

Unit tests colocated with each module cover the properties in isolation;
this module drives whole programs through real scans the way an embedder
would, the same role the teacher's `bus/tests.rs` plays for `Bus` + `Cpu`
integration.
*/

#[cfg(test)]
mod tests {
    use crate::compiler::{CoilType, ContactType, LadCompiler, LadElement, LadNetwork, LadProgram, LadRung};
    use crate::ir::{CoilHint, Expression, Network, ObKind, Operand, OrganizationBlock, Program, Statement};
    use crate::runtime::Runtime;
    use crate::value::TagValue;

    fn no(operand: &str) -> LadElement {
        LadElement::Contact {
            contact_type: ContactType::No,
            operand: operand.to_string(),
        }
    }

    fn coil(operand: &str) -> LadElement {
        LadElement::Coil {
            coil_type: CoilType::Output,
            operand: operand.to_string(),
        }
    }

    fn one_rung_lad(elements: Vec<LadElement>) -> LadProgram {
        LadProgram {
            version: "1.0".to_string(),
            networks: vec![LadNetwork {
                id: "n1".to_string(),
                rungs: vec![LadRung {
                    id: "r1".to_string(),
                    elements,
                }],
            }],
        }
    }

    /// S1 - simple contact: start_button drives motor_output directly.
    #[test]
    fn s1_simple_contact() {
        let lad = one_rung_lad(vec![no("start_button"), coil("motor_output")]);
        let program = LadCompiler::compile(&lad).unwrap();
        let mut rt = Runtime::new();
        rt.load(program).unwrap();

        rt.set_tag("start_button", TagValue::Bool(false));
        let r = rt.scan(Some(0)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(false)));

        rt.set_tag("start_button", TagValue::Bool(true));
        let r = rt.scan(Some(10)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(true)));

        rt.set_tag("start_button", TagValue::Bool(false));
        let r = rt.scan(Some(20)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(false)));
    }

    /// S2 - OR branch: either start_button or seal_contact drives the coil.
    #[test]
    fn s2_or_branch() {
        let lad = one_rung_lad(vec![
            LadElement::Branch {
                branches: vec![vec![no("start_button")], vec![no("seal_contact")]],
            },
            coil("motor_output"),
        ]);
        let program = LadCompiler::compile(&lad).unwrap();
        let mut rt = Runtime::new();
        rt.load(program).unwrap();

        rt.set_tag("start_button", TagValue::Bool(true));
        rt.set_tag("seal_contact", TagValue::Bool(false));
        let r = rt.scan(Some(0)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(true)));

        rt.set_tag("start_button", TagValue::Bool(false));
        rt.set_tag("seal_contact", TagValue::Bool(false));
        let r = rt.scan(Some(10)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(false)));
    }

    /// S3 - AND series: both contacts must be true.
    #[test]
    fn s3_and_series() {
        let lad = one_rung_lad(vec![no("contact_a"), no("contact_b"), coil("output")]);
        let program = LadCompiler::compile(&lad).unwrap();
        let mut rt = Runtime::new();
        rt.load(program).unwrap();

        rt.set_tag("contact_a", TagValue::Bool(true));
        rt.set_tag("contact_b", TagValue::Bool(false));
        let r = rt.scan(Some(0)).unwrap();
        assert_eq!(r.tag_values.get("output"), Some(&TagValue::Bool(false)));

        rt.set_tag("contact_b", TagValue::Bool(true));
        let r = rt.scan(Some(10)).unwrap();
        assert_eq!(r.tag_values.get("output"), Some(&TagValue::Bool(true)));
    }

    fn assign(id: &str, target: &str, expr: Expression) -> Statement {
        Statement::Assignment {
            id: id.to_string(),
            target: Operand::tag(target),
            expr,
            coil_hint: Some(CoilHint::Output),
        }
    }

    /// S4 - seal-in with stop dominance: N2 overwrites N1 within the scan.
    #[test]
    fn s4_seal_in_with_stop_dominance() {
        let program = Program {
            version: "1.0".to_string(),
            organization_blocks: vec![OrganizationBlock {
                id: "ob1".to_string(),
                name: "Main".to_string(),
                kind: ObKind::Cyclic,
                networks: vec![Network {
                    id: "n1".to_string(),
                    title: String::new(),
                    comment: String::new(),
                    statements: vec![assign(
                        "n1",
                        "motor_output",
                        Expression::or(
                            Expression::operand(Operand::tag("start_button")),
                            Expression::operand(Operand::tag("motor_output")),
                        ),
                    )],
                }, Network {
                    id: "n2".to_string(),
                    title: String::new(),
                    comment: String::new(),
                    statements: vec![assign(
                        "n2",
                        "motor_output",
                        Expression::and(
                            Expression::operand(Operand::tag("motor_output")),
                            Expression::not(Expression::operand(Operand::tag("stop_button"))),
                        ),
                    )],
                }],
            }],
            functions: Vec::new(),
            function_blocks: Vec::new(),
        };

        let mut rt = Runtime::new();
        rt.load(program).unwrap();
        rt.set_tag("start_button", TagValue::Bool(false));
        rt.set_tag("stop_button", TagValue::Bool(false));
        rt.set_tag("motor_output", TagValue::Bool(false));

        // Press start.
        rt.set_tag("start_button", TagValue::Bool(true));
        let r = rt.scan(Some(0)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(true)));

        // Release start; seal-in keeps it on.
        rt.set_tag("start_button", TagValue::Bool(false));
        let r = rt.scan(Some(10)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(true)));

        // Press stop: motor off in the same scan.
        rt.set_tag("stop_button", TagValue::Bool(true));
        let r = rt.scan(Some(20)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(false)));

        // Holding start+stop simultaneously: stop wins.
        rt.set_tag("start_button", TagValue::Bool(true));
        rt.set_tag("stop_button", TagValue::Bool(true));
        let r = rt.scan(Some(30)).unwrap();
        assert_eq!(r.tag_values.get("motor_output"), Some(&TagValue::Bool(false)));
    }

    /// S5 - pushbutton counter: rising edge increments, falling edge resets.
    #[test]
    fn s5_pushbutton_rising_edge_counter() {
        let program = Program {
            version: "1.0".to_string(),
            organization_blocks: vec![OrganizationBlock {
                id: "ob1".to_string(),
                name: "Main".to_string(),
                kind: ObKind::Cyclic,
                networks: vec![Network {
                    id: "n1".to_string(),
                    title: String::new(),
                    comment: String::new(),
                    statements: vec![
                        Statement::If {
                            id: "s1".to_string(),
                            condition: Expression::operand(
                                Operand::tag("push_button").with_edge(crate::ir::EdgeKind::Rising),
                            ),
                            then_block: vec![assign(
                                "s1a",
                                "button_count",
                                Expression::Binary {
                                    op: crate::ir::BinaryOp::Add,
                                    lhs: Box::new(Expression::operand(Operand::tag("button_count"))),
                                    rhs: Box::new(Expression::Literal(crate::ir::Literal::Number(1.0))),
                                },
                            )],
                            elsif_blocks: vec![],
                            else_block: None,
                        },
                        Statement::If {
                            id: "s2".to_string(),
                            condition: Expression::operand(
                                Operand::tag("reset_button").with_edge(crate::ir::EdgeKind::Falling),
                            ),
                            then_block: vec![assign(
                                "s2a",
                                "button_count",
                                Expression::Literal(crate::ir::Literal::Number(0.0)),
                            )],
                            elsif_blocks: vec![],
                            else_block: None,
                        },
                        assign(
                            "s3",
                            "status_led",
                            Expression::Binary {
                                op: crate::ir::BinaryOp::Ne,
                                lhs: Box::new(Expression::operand(Operand::tag("button_count"))),
                                rhs: Box::new(Expression::Literal(crate::ir::Literal::Number(0.0))),
                            },
                        ),
                    ],
                }],
            }],
            functions: Vec::new(),
            function_blocks: Vec::new(),
        };

        let mut rt = Runtime::new();
        rt.load(program).unwrap();
        rt.set_tag("push_button", TagValue::Bool(false));
        rt.set_tag("reset_button", TagValue::Bool(false));
        rt.set_tag("button_count", TagValue::Real(0.0));

        // Press.
        rt.set_tag("push_button", TagValue::Bool(true));
        let r = rt.scan(Some(0)).unwrap();
        assert_eq!(r.tag_values.get("button_count"), Some(&TagValue::Real(1.0)));
        assert_eq!(r.tag_values.get("status_led"), Some(&TagValue::Bool(true)));

        // Hold: no further increment.
        let r = rt.scan(Some(10)).unwrap();
        assert_eq!(r.tag_values.get("button_count"), Some(&TagValue::Real(1.0)));

        // Release then press again.
        rt.set_tag("push_button", TagValue::Bool(false));
        rt.scan(Some(20)).unwrap();
        rt.set_tag("push_button", TagValue::Bool(true));
        let r = rt.scan(Some(30)).unwrap();
        assert_eq!(r.tag_values.get("button_count"), Some(&TagValue::Real(2.0)));

        // Falling edge of reset zeros the count.
        rt.set_tag("reset_button", TagValue::Bool(true));
        rt.scan(Some(40)).unwrap();
        rt.set_tag("reset_button", TagValue::Bool(false));
        let r = rt.scan(Some(50)).unwrap();
        assert_eq!(r.tag_values.get("button_count"), Some(&TagValue::Real(0.0)));
        assert_eq!(r.tag_values.get("status_led"), Some(&TagValue::Bool(false)));
    }

    /// S6 - TON blink head: Q/ET track elapsed time against PT=1000.
    #[test]
    fn s6_ton_blink_head() {
        let program = Program {
            version: "1.0".to_string(),
            organization_blocks: vec![OrganizationBlock {
                id: "ob1".to_string(),
                name: "Main".to_string(),
                kind: ObKind::Cyclic,
                networks: vec![Network {
                    id: "n1".to_string(),
                    title: String::new(),
                    comment: String::new(),
                    statements: vec![Statement::Call {
                        id: "s1".to_string(),
                        function: "TON".to_string(),
                        instance: Operand::tag("blink_timer"),
                        inputs: {
                            let mut m = std::collections::BTreeMap::new();
                            m.insert("IN".to_string(), Expression::operand(Operand::tag("enable")));
                            m.insert(
                                "PT".to_string(),
                                Expression::Literal(crate::ir::Literal::Number(1000.0)),
                            );
                            m
                        },
                        outputs: {
                            let mut m = std::collections::BTreeMap::new();
                            m.insert("Q".to_string(), Operand::tag("blink_q"));
                            m.insert("ET".to_string(), Operand::tag("blink_et"));
                            m
                        },
                    }],
                }],
            }],
            functions: Vec::new(),
            function_blocks: Vec::new(),
        };

        let mut rt = Runtime::new();
        rt.load(program).unwrap();
        rt.set_tag("enable", TagValue::Bool(true));

        let r = rt.scan(Some(0)).unwrap();
        assert_eq!(r.tag_values.get("blink_et"), Some(&TagValue::Time(0)));
        assert_eq!(r.tag_values.get("blink_q"), Some(&TagValue::Bool(false)));

        let r = rt.scan(Some(500)).unwrap();
        assert_eq!(r.tag_values.get("blink_et"), Some(&TagValue::Time(500)));
        assert_eq!(r.tag_values.get("blink_q"), Some(&TagValue::Bool(false)));

        let r = rt.scan(Some(1000)).unwrap();
        assert_eq!(r.tag_values.get("blink_et"), Some(&TagValue::Time(1000)));
        assert_eq!(r.tag_values.get("blink_q"), Some(&TagValue::Bool(true)));

        rt.set_tag("enable", TagValue::Bool(false));
        let r = rt.scan(Some(1100)).unwrap();
        assert_eq!(r.tag_values.get("blink_et"), Some(&TagValue::Time(0)));
        assert_eq!(r.tag_values.get("blink_q"), Some(&TagValue::Bool(false)));
    }

    /// P7 - LAD->IR round trip for a single NO contact and an OTE coil.
    #[test]
    fn p7_lad_to_ir_round_trip() {
        let lad = one_rung_lad(vec![no("x"), coil("y")]);
        let program = LadCompiler::compile(&lad).unwrap();
        let stmt = &program.organization_blocks[0].networks[0].statements[0];
        match stmt {
            Statement::Assignment { target, expr, .. } => {
                assert_eq!(target.tag.as_deref(), Some("y"));
                match expr {
                    Expression::Operand(op) => assert_eq!(op.tag.as_deref(), Some("x")),
                    _ => panic!("expected a bare operand expression"),
                }
            }
            _ => panic!("expected a single assignment statement"),
        }
    }
}
