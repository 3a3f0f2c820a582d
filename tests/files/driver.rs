#[cfg(test)]
mod verify {
    use std::fs;
    use std::path::PathBuf;

    use refmt::files::{style_dir, style_file, style_pkg};
    use refmt::guides;
    use refmt::language::{Dry, FileOptions};
    use refmt::problem::StyleError;

    /// Options for tests: no shared on-disk cache, write-back by default.
    fn options() -> FileOptions {
        let mut options = FileOptions::default();
        options.cache = false;
        options
    }

    #[test]
    fn files_are_rewritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("script.R");
        fs::write(&file, "a<-1\n").unwrap();

        let changed = style_file(&file, &guides::tidy(), &options()).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&file).unwrap(), "a <- 1\n");

        // a second run finds nothing to do
        let changed = style_file(&file, &guides::tidy(), &options()).unwrap();
        assert!(!changed);
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("script.R");
        fs::write(&file, "a<-1\n").unwrap();

        let mut opts = options();
        opts.dry = Dry::On;
        let changed = style_file(&file, &guides::tidy(), &opts).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&file).unwrap(), "a<-1\n");
    }

    #[test]
    fn dry_fail_rejects_unstyled_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("script.R");
        fs::write(&file, "a<-1\n").unwrap();

        let mut opts = options();
        opts.dry = Dry::Fail;
        let error = style_file(&file, &guides::tidy(), &opts).unwrap_err();
        assert!(matches!(error, StyleError::Dirty(_)));
        assert_eq!(fs::read_to_string(&file).unwrap(), "a<-1\n");

        fs::write(&file, "a <- 1\n").unwrap();
        let changed = style_file(&file, &guides::tidy(), &opts).unwrap();
        assert!(!changed);
    }

    #[test]
    fn unrecognized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("notes.txt");
        fs::write(&file, "hello\n").unwrap();

        let error = style_file(&file, &guides::tidy(), &options()).unwrap_err();
        assert!(matches!(error, StyleError::InvalidOption(_)));
    }

    #[test]
    fn directories_are_walked_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path()
                .join("one.R"),
            "a<-1\n",
        )
        .unwrap();
        fs::write(
            dir.path()
                .join("notes.txt"),
            "prose\n",
        )
        .unwrap();
        fs::create_dir(
            dir.path()
                .join("nested"),
        )
        .unwrap();
        fs::write(
            dir.path()
                .join("nested")
                .join("two.R"),
            "b <- 2\n",
        )
        .unwrap();
        fs::create_dir(
            dir.path()
                .join("renv"),
        )
        .unwrap();
        fs::write(
            dir.path()
                .join("renv")
                .join("skipped.R"),
            "c<-3\n",
        )
        .unwrap();

        let results = style_dir(
            dir.path(),
            &guides::tidy(),
            &options(),
            true,
        )
        .unwrap();

        let names: Vec<String> = results
            .iter()
            .map(|(path, _)| {
                path.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        // paths sort component-wise, so the nested file comes first
        assert_eq!(names, vec!["two.R", "one.R"]);

        let changed: Vec<bool> = results
            .into_iter()
            .map(|(_, changed)| changed)
            .collect();
        assert_eq!(changed, vec![false, true]);

        // the excluded directory was left alone
        assert_eq!(
            fs::read_to_string(
                dir.path()
                    .join("renv")
                    .join("skipped.R")
            )
            .unwrap(),
            "c<-3\n"
        );
    }

    #[test]
    fn non_recursive_walks_stay_shallow() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path()
                .join("top.R"),
            "a <- 1\n",
        )
        .unwrap();
        fs::create_dir(
            dir.path()
                .join("nested"),
        )
        .unwrap();
        fs::write(
            dir.path()
                .join("nested")
                .join("deep.R"),
            "b <- 2\n",
        )
        .unwrap();

        let results = style_dir(
            dir.path(),
            &guides::tidy(),
            &options(),
            false,
        )
        .unwrap();
        assert_eq!(
            results
                .len(),
            1
        );
    }

    #[test]
    fn excluded_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path()
                .join("keep.R"),
            "a<-1\n",
        )
        .unwrap();
        fs::write(
            dir.path()
                .join("generated.R"),
            "b<-2\n",
        )
        .unwrap();

        let mut opts = options();
        opts.exclude_files = vec![PathBuf::from("generated.R")];
        let results = style_dir(
            dir.path(),
            &guides::tidy(),
            &opts,
            true,
        )
        .unwrap();
        assert_eq!(
            results
                .len(),
            1
        );
        assert_eq!(
            fs::read_to_string(
                dir.path()
                    .join("generated.R")
            )
            .unwrap(),
            "b<-2\n"
        );
    }

    #[test]
    fn packages_need_a_description_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = style_pkg(dir.path(), &guides::tidy(), &options()).unwrap_err();
        assert!(matches!(error, StyleError::InvalidOption(_)));

        fs::write(
            dir.path()
                .join("DESCRIPTION"),
            "Package: demo\n",
        )
        .unwrap();
        fs::create_dir(
            dir.path()
                .join("R"),
        )
        .unwrap();
        fs::write(
            dir.path()
                .join("R")
                .join("code.R"),
            "a<-1\n",
        )
        .unwrap();

        let results = style_pkg(dir.path(), &guides::tidy(), &options()).unwrap();
        assert_eq!(
            results
                .len(),
            1
        );
        assert_eq!(
            fs::read_to_string(
                dir.path()
                    .join("R")
                    .join("code.R")
            )
            .unwrap(),
            "a <- 1\n"
        );
    }

    #[test]
    fn literate_documents_route_through_chunk_styling() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir
            .path()
            .join("report.Rmd");
        fs::write(&file, "# Title\n\n```{r}\na<-1\n```\n").unwrap();

        let changed = style_file(&file, &guides::tidy(), &options()).unwrap();
        assert!(changed);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "# Title\n\n```{r}\na <- 1\n```\n"
        );
    }
}
