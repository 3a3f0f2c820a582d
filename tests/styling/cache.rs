#[cfg(test)]
mod verify {
    use refmt::guides;
    use refmt::styling::{style_text, style_text_with, DirStore, NoStore, Store};

    fn dir_store() -> (tempfile::TempDir, DirStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn cached_and_uncached_agree_byte_for_byte() {
        let (_dir, store) = dir_store();
        let guide = guides::tidy();
        let source = "f <- function(x) {\nx + 1\n}\n\ncall( 3)\n";

        let plain = style_text(source, &guide)
            .unwrap()
            .text;

        // first run populates the store, second run hits it
        let first = style_text_with(source, &guide, &store)
            .unwrap()
            .text;
        let second = style_text_with(&first, &guide, &store)
            .unwrap()
            .text;

        assert_eq!(first, plain);
        assert_eq!(second, plain);
    }

    #[test]
    fn styled_output_is_recorded() {
        let (_dir, store) = dir_store();
        let guide = guides::tidy();

        let styled = style_text_with("a<-1\n", &guide, &store).unwrap();
        assert_eq!(styled.text, "a <- 1\n");

        // the output expression is now a cache hit
        let again = style_text_with("a <- 1\n", &guide, &store).unwrap();
        assert_eq!(again.text, "a <- 1\n");
        assert!(!again.changed);
    }

    #[test]
    fn cached_expression_sharing_a_line_with_an_uncached_one() {
        let (_dir, store) = dir_store();
        let guide = guides::tidy();

        // make "a <- 1" a known-styled expression
        style_text_with("a <- 1\n", &guide, &store).unwrap();

        // it shares a block with an expression that still needs styling
        let styled = style_text_with("a <- 1; b<-2\n", &guide, &store).unwrap();
        assert_eq!(styled.text, "a <- 1\nb <- 2\n");
    }

    #[test]
    fn different_guides_do_not_share_entries() {
        let (_dir, store) = dir_store();
        let strict = guides::tidy();

        let mut relaxed_options = refmt::language::GuideOptions::default();
        relaxed_options.strict = false;
        let relaxed = guides::tidy_with(relaxed_options);

        style_text_with("a  <-  1\n", &relaxed, &store).unwrap();
        // the strict guide must not treat the relaxed result as styled
        let styled = style_text_with("a  <-  1\n", &strict, &store).unwrap();
        assert_eq!(styled.text, "a <- 1\n");
    }

    #[test]
    fn comments_between_cached_expressions_survive() {
        let (_dir, store) = dir_store();
        let guide = guides::tidy();

        let source = "# leading note\na <- 1\n";
        let first = style_text_with(source, &guide, &store).unwrap();
        assert_eq!(first.text, source);

        let second = style_text_with(source, &guide, &store).unwrap();
        assert_eq!(second.text, source);
        assert!(!second.changed);
    }

    #[test]
    fn disabled_store_never_hits() {
        assert!(!NoStore.lookup("anything"));
        NoStore.record("anything");
        assert!(!NoStore.lookup("anything"));
    }
}
