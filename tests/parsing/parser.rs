#[cfg(test)]
mod verify {
    use std::collections::HashMap;

    use refmt::language::{slice_span, Id, Kind, Token};
    use refmt::parsing::parse;

    const SAMPLE: &str = "# leading\nresult <- data %>%\n  filter(x > 0) %>%\n  mutate(y = x^2)\nif (nrow(result) > 0) {\n  print(result)\n}\n";

    #[test]
    fn every_row_has_a_resolvable_parent() {
        let rows = parse(SAMPLE).unwrap();
        let ids: HashMap<Id, ()> = rows
            .iter()
            .map(|row| (row.id, ()))
            .collect();
        for row in &rows {
            if row.parent > 0 {
                assert!(ids.contains_key(&row.parent), "dangling parent for {:?}", row.text);
            }
            if row.parent < 0 {
                assert!(ids.contains_key(&-row.parent));
            }
        }
    }

    #[test]
    fn pos_ids_are_a_total_order() {
        let rows = parse(SAMPLE).unwrap();
        let mut seen = 0;
        for row in &rows {
            assert!(row.pos_id > seen);
            seen = row.pos_id;
        }
    }

    #[test]
    fn terminal_spans_recover_their_spelling() {
        let rows = parse(SAMPLE).unwrap();
        for row in rows
            .iter()
            .filter(|row| row.terminal)
        {
            assert_eq!(
                slice_span(SAMPLE, row.line1, row.col1, row.line2, row.col2),
                row.text,
                "span mismatch at {}:{}",
                row.line1,
                row.col1
            );
        }
    }

    #[test]
    fn non_terminals_span_their_children() {
        let rows = parse(SAMPLE).unwrap();
        let by_id: HashMap<Id, &Token> = rows
            .iter()
            .map(|row| (row.id, row))
            .collect();
        for row in &rows {
            if row.parent <= 0 {
                continue;
            }
            let parent = by_id[&row.parent];
            assert!(
                (parent.line1, parent.col1) <= (row.line1, row.col1),
                "child starts before its parent"
            );
            assert!(
                (row.line2, row.col2) <= (parent.line2, parent.col2),
                "child ends after its parent"
            );
        }
    }

    #[test]
    fn pipes_are_refined_from_the_generic_special() {
        let rows = parse(SAMPLE).unwrap();
        assert!(rows
            .iter()
            .filter(|row| row.text == "%>%")
            .all(|row| row.kind == Kind::SpecialPipe));
        assert!(rows
            .iter()
            .all(|row| row.kind != Kind::Special));
    }

    #[test]
    fn named_arguments_are_distinguished_from_assignment() {
        let rows = parse("f(x = 1)\na = 2\nfunction(y = 3) y\n").unwrap();
        let eq_kinds: Vec<Kind> = rows
            .iter()
            .filter(|row| row.text == "=")
            .map(|row| row.kind)
            .collect();
        assert_eq!(eq_kinds, vec![Kind::EqSub, Kind::EqAssign, Kind::EqFormals]);
    }

    #[test]
    fn errors_carry_the_failing_position() {
        let error = parse("x <- (1 +\n").unwrap_err();
        match error {
            refmt::problem::StyleError::Parse(problem) => {
                assert!(problem
                    .location
                    .line
                    >= 1);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn a_realistic_script_parses_completely() {
        let source = r#"
utils <- new.env()

clamp <- function(x, lo = 0, hi = 1) {
  pmin(pmax(x, lo), hi)
}

normalize <- function(v) {
  span <- max(v) - min(v)
  if (span == 0) {
    rep(0, length(v))
  } else {
    (v - min(v)) / span
  }
}

scores[["final"]] <- weights %>%
  normalize() %>%
  clamp(lo = 0.05, hi = 0.95)
"#;
        let rows = parse(source).unwrap();
        assert!(rows
            .len()
            > 50);
        assert!(rows
            .iter()
            .any(|row| row.kind == Kind::LeftBracket2));
        assert!(rows
            .iter()
            .any(|row| row.kind == Kind::EqFormals));
        assert!(rows
            .iter()
            .any(|row| row.kind == Kind::EqSub));
    }
}
