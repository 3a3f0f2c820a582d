#[cfg(test)]
mod verify {
    use refmt::guides;
    use refmt::language::{GuideOptions, Scope};
    use refmt::styling::style_text;

    fn tidy(source: &str) -> String {
        style_text(source, &guides::tidy())
            .unwrap()
            .text
    }

    fn tidy_scoped(source: &str, scope: Scope) -> String {
        let mut options = GuideOptions::default();
        options.scope = scope;
        style_text(source, &guides::tidy_with(options))
            .unwrap()
            .text
    }

    #[test]
    fn spaces_inside_calls() {
        assert_eq!(tidy("call( 3)"), "call(3)\n");
        assert_eq!(tidy("call (3 )"), "call(3)\n");
        assert_eq!(tidy("mean( x,na.rm=TRUE )"), "mean(x, na.rm = TRUE)\n");
    }

    #[test]
    fn spaces_around_operators() {
        assert_eq!(tidy("a<-3++1"), "a <- 3 + +1\n");
        assert_eq!(tidy("1+2*3"), "1 + 2 * 3\n");
        assert_eq!(tidy("a%>%b"), "a %>% b\n");
        assert_eq!(tidy("x|>f()"), "x |> f()\n");
        assert_eq!(tidy("a&&b||c"), "a && b || c\n");
    }

    #[test]
    fn tight_operators_stay_tight() {
        assert_eq!(tidy("x $ y"), "x$y\n");
        assert_eq!(tidy("pkg :: fun(x)"), "pkg::fun(x)\n");
        assert_eq!(tidy("1 : 10"), "1:10\n");
        assert_eq!(tidy("x ^ 2"), "x^2\n");
        assert_eq!(tidy("- x"), "-x\n");
        assert_eq!(tidy("! done"), "!done\n");
    }

    #[test]
    fn keywords_get_breathing_room() {
        assert_eq!(tidy("if(x>1)y"), "if (x > 1) y\n");
        assert_eq!(tidy("for(i in 1:3)print(i)"), "for (i in 1:3) print(i)\n");
        assert_eq!(tidy("while(TRUE)break"), "while (TRUE) break\n");
        assert_eq!(tidy("function(x)x"), "function(x) x\n");
    }

    #[test]
    fn ignore_region_is_preserved_verbatim() {
        let input = "1+1\n# refmt: off\n1+1\n# refmt: on\n1+1";
        let output = "1 + 1\n# refmt: off\n1+1\n# refmt: on\n1 + 1\n";
        assert_eq!(tidy(input), output);
    }

    #[test]
    fn inline_ignore_marker_covers_one_line() {
        let input = "a<-1 # refmt: off\nb<-2\n";
        assert_eq!(tidy(input), "a<-1 # refmt: off\nb <- 2\n");
    }

    #[test]
    fn unbalanced_markers_leave_the_file_alone() {
        let input = "1+1\n# refmt: off\n1+1\n# refmt: off\n1+1";
        let styled = style_text(input, &guides::tidy()).unwrap();
        assert_eq!(styled.text, input);
        assert!(!styled.changed);
    }

    #[test]
    fn semicolons_become_line_breaks() {
        assert_eq!(
            tidy_scoped("a %>% b; a", Scope::LineBreaks),
            "a %>% b\na\n"
        );
        assert_eq!(tidy("x <- 1; y <- 2; z"), "x <- 1\ny <- 2\nz\n");
    }

    #[test]
    fn styling_twice_changes_nothing() {
        for input in [
            "a<-3++1",
            "call( 3)",
            "f <- function(x) {\nx + 1\n}",
            "if(a){b}else{c}",
            "x<-'hi' # trailing note\n\n\n\ny",
            "a %>%\nb %>%\nc",
        ] {
            let once = tidy(input);
            let twice = tidy(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn empty_input_empty_output() {
        let styled = style_text("", &guides::tidy()).unwrap();
        assert_eq!(styled.text, "");
        assert!(!styled.changed);
    }

    #[test]
    fn comment_only_file_is_unchanged() {
        let input = "# just a note\n# and another\n";
        let styled = style_text(input, &guides::tidy()).unwrap();
        assert_eq!(styled.text, input);
        assert!(!styled.changed);
    }

    #[test]
    fn brace_bodies_are_indented() {
        assert_eq!(
            tidy("f <- function(x) {\nx + 1\n}"),
            "f <- function(x) {\n  x + 1\n}\n"
        );
    }

    #[test]
    fn nested_braces_nest_indention() {
        assert_eq!(
            tidy("if (a) {\nif (b) {\nc\n}\n}"),
            "if (a) {\n  if (b) {\n    c\n  }\n}\n"
        );
    }

    #[test]
    fn single_line_if_gets_broken_and_braced_layout() {
        assert_eq!(tidy("if(a){b}else{c}"), "if (a) {\n  b\n} else {\n  c\n}\n");
    }

    #[test]
    fn pipe_continuations_indent() {
        assert_eq!(tidy("a %>%\nb %>%\nc"), "a %>%\n  b %>%\n  c\n");
    }

    #[test]
    fn call_arguments_indent_after_break() {
        assert_eq!(tidy("call(\n3)"), "call(\n  3\n)\n");
    }

    #[test]
    fn statements_in_braces_split_on_semicolons() {
        assert_eq!(tidy("{\na; b\n}"), "{\n  a\n  b\n}\n");
    }

    #[test]
    fn assignment_is_spelled_with_an_arrow() {
        assert_eq!(tidy("a = 1"), "a <- 1\n");
        assert_eq!(tidy("a = b = 2"), "a <- b <- 2\n");
        // named arguments and formal defaults are not assignments
        assert_eq!(tidy("f(x = 1)"), "f(x = 1)\n");
        assert_eq!(tidy("function(x = 1) x"), "function(x = 1) x\n");
    }

    #[test]
    fn narrower_scopes_leave_tokens_alone() {
        assert_eq!(tidy_scoped("a = 1", Scope::LineBreaks), "a = 1\n");
        assert_eq!(tidy_scoped("x <- 'hi'", Scope::LineBreaks), "x <- 'hi'\n");
    }

    #[test]
    fn quotes_prefer_double() {
        assert_eq!(tidy("x <- 'hi'"), "x <- \"hi\"\n");
        // a literal double quote inside keeps the single quotes
        assert_eq!(tidy("x <- 'say \"hi\"'"), "x <- 'say \"hi\"'\n");
    }

    #[test]
    fn scope_spaces_preserves_layout() {
        let input = "f(a,\n   b)\n";
        assert_eq!(tidy_scoped(input, Scope::Spaces), input);
    }

    #[test]
    fn relaxed_styling_only_adds() {
        let mut options = GuideOptions::default();
        options.strict = false;
        let guide = guides::tidy_with(options);
        // aligned extra spaces survive, missing spaces appear
        assert_eq!(
            style_text("a  <-  1\n", &guide)
                .unwrap()
                .text,
            "a  <-  1\n"
        );
        assert_eq!(
            style_text("a<-1", &guide)
                .unwrap()
                .text,
            "a <- 1\n"
        );
    }

    #[test]
    fn base_indention_shifts_everything() {
        let mut options = GuideOptions::default();
        options.base_indention = 4;
        let guide = guides::tidy_with(options);
        assert_eq!(
            style_text("a <- 1\nb", &guide)
                .unwrap()
                .text,
            "    a <- 1\n    b\n"
        );
    }

    #[test]
    fn blank_lines_are_capped() {
        assert_eq!(tidy("a\n\n\n\n\nb"), "a\n\n\nb\n");
        // leading blank lines disappear
        assert_eq!(tidy("\n\na"), "a\n");
    }

    #[test]
    fn trailing_comments_stay_attached() {
        assert_eq!(tidy("x <- 1 # note"), "x <- 1 # note\n");
        assert_eq!(tidy("x<-1# note"), "x <- 1 # note\n");
    }

    #[test]
    fn comments_inside_blocks_indent_with_them() {
        assert_eq!(
            tidy("f <- function() {\n# setup\n1\n}"),
            "f <- function() {\n  # setup\n  1\n}\n"
        );
    }

    #[test]
    fn roxygen_examples_are_styled() {
        let input = "#' Add one.\n#'\n#' @examples\n#' add_one( 1)\n#' @export\nadd_one <- function(x) x + 1\n";
        let output = tidy(input);
        assert!(output.contains("#' add_one(1)"));
        assert!(output.contains("#' @export"));
    }

    #[test]
    fn roxygen_examples_can_be_left_alone() {
        let mut options = GuideOptions::default();
        options.include_roxygen_examples = false;
        let guide = guides::tidy_with(options);
        let input = "#' @examples\n#' add_one( 1)\nNULL\n";
        let output = style_text(input, &guide)
            .unwrap()
            .text;
        assert!(output.contains("#' add_one( 1)"));
    }

    #[test]
    fn changed_flag_tracks_output() {
        assert!(style_text("a<-1", &guides::tidy())
            .unwrap()
            .changed);
        assert!(!style_text("a <- 1\n", &guides::tidy())
            .unwrap()
            .changed);
    }

    #[test]
    fn parse_failures_surface_with_location() {
        let error = style_text("f(", &guides::tidy()).unwrap_err();
        match error {
            refmt::problem::StyleError::Parse(problem) => {
                assert_eq!(
                    problem
                        .location
                        .line,
                    1
                );
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}
