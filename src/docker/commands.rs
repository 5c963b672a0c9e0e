//! Shell command shapes sent to the target machine.

use std::path::Path;

use crate::comm::Communicator;
use crate::error::ProvisionError;

/// Inline reference to the id stored in an id-file.
///
/// The id is never read back locally; each command re-reads the file.
pub fn cid_ref(cidfile: &str) -> String {
    format!("$(cat {})", shell_words::quote(cidfile))
}

/// Succeeds when the image reference shows up in the local image list.
pub fn image_present(image: &str) -> String {
    format!("docker images | grep -wFq {}", shell_words::quote(image))
}

pub fn pull(image: &str) -> String {
    format!("docker pull {}", shell_words::quote(image))
}

pub fn daemon_running(pid_file: &Path) -> String {
    format!(
        "test -f {}",
        shell_words::quote(&pid_file.display().to_string())
    )
}

pub fn make_dir(dir: &Path) -> String {
    format!("mkdir -p {}", shell_words::quote(&dir.display().to_string()))
}

pub fn start(cidfile: &str) -> String {
    format!("docker start {}", cid_ref(cidfile))
}

/// Remove any stale id-file, then create the container detached.
///
/// Flag order is fixed: id-file, detach, extra args, image, command.
pub fn create(cidfile: &str, image: &str, args: Option<&str>, cmd: Option<&str>) -> String {
    let cidfile_arg = shell_words::quote(cidfile);
    let mut run = vec![
        "docker".to_string(),
        "run".into(),
        format!("--cidfile={cidfile_arg}"),
        "-d".into(),
    ];
    run.extend(non_blank(args));
    run.push(shell_words::quote(image).into_owned());
    run.extend(non_blank(cmd));

    format!("rm -f {cidfile_arg} && {}", run.join(" "))
}

fn non_blank(part: Option<&str>) -> Option<String> {
    part.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A check that holds when either of two command forms succeeds.
///
/// Old daemons list short container ids while newer ones (and the id-file)
/// use the full id, so both listings are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualCheck {
    pub short: String,
    pub full: String,
}

impl DualCheck {
    /// Test `short` first and only fall back to `full` when it fails.
    pub fn holds(&self, comm: &dyn Communicator) -> Result<bool, ProvisionError> {
        Ok(comm.test(&self.short, true)? || comm.test(&self.full, true)?)
    }
}

/// The container appears in the all-states listing.
pub fn exists(cidfile: &str) -> DualCheck {
    listing_check("docker ps -a -q", cidfile)
}

/// The container appears in the running listing.
pub fn running(cidfile: &str) -> DualCheck {
    listing_check("docker ps -q", cidfile)
}

fn listing_check(list: &str, cidfile: &str) -> DualCheck {
    let grep = format!("grep -wFq {}", cid_ref(cidfile));
    DualCheck {
        short: format!("{list} | {grep}"),
        full: format!("{list} --no-trunc | {grep}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeComm;

    const CID: &str = "/var/lib/vagrant/cids/abc";

    #[test]
    fn image_commands() {
        assert_eq!(image_present("nginx"), "docker images | grep -wFq nginx");
        assert_eq!(pull("redis:7"), "docker pull redis:7");
    }

    #[test]
    fn daemon_and_dir_commands() {
        assert_eq!(
            daemon_running(Path::new("/var/run/docker.pid")),
            "test -f /var/run/docker.pid"
        );
        assert_eq!(
            make_dir(Path::new("/var/lib/vagrant/cids")),
            "mkdir -p /var/lib/vagrant/cids"
        );
    }

    #[test]
    fn exists_check_tries_short_then_full_listing() {
        let check = exists(CID);
        assert_eq!(check.short, format!("docker ps -a -q | grep -wFq $(cat {CID})"));
        assert_eq!(
            check.full,
            format!("docker ps -a -q --no-trunc | grep -wFq $(cat {CID})")
        );
    }

    #[test]
    fn running_check_uses_running_listing() {
        let check = running(CID);
        assert_eq!(check.short, format!("docker ps -q | grep -wFq $(cat {CID})"));
        assert_eq!(
            check.full,
            format!("docker ps -q --no-trunc | grep -wFq $(cat {CID})")
        );
    }

    #[test]
    fn start_references_id_file() {
        assert_eq!(start(CID), format!("docker start $(cat {CID})"));
    }

    #[test]
    fn create_orders_flags() {
        let cmd = create(CID, "nginx", Some("-p 80:80"), Some("nginx -g 'daemon off;'"));
        assert_eq!(
            cmd,
            format!(
                "rm -f {CID} && docker run --cidfile={CID} -d -p 80:80 nginx nginx -g 'daemon off;'"
            )
        );
    }

    #[test]
    fn create_skips_absent_and_blank_parts() {
        assert_eq!(
            create(CID, "redis", None, Some("  ")),
            format!("rm -f {CID} && docker run --cidfile={CID} -d redis")
        );
    }

    #[test]
    fn paths_with_spaces_are_quoted() {
        assert_eq!(cid_ref("/tmp/my ids/web"), "$(cat '/tmp/my ids/web')");
    }

    #[test]
    fn dual_check_short_circuits_on_short_form() {
        let check = exists(CID);
        let comm = FakeComm::new().passing(&check.short);
        assert!(check.holds(&comm).unwrap());
        assert_eq!(comm.test_commands(), vec![check.short.clone()]);
    }

    #[test]
    fn dual_check_falls_back_to_full_form() {
        let check = exists(CID);
        let comm = FakeComm::new().passing(&check.full);
        assert!(check.holds(&comm).unwrap());
        assert_eq!(comm.test_commands(), vec![check.short.clone(), check.full.clone()]);
    }

    #[test]
    fn dual_check_fails_when_neither_form_matches() {
        let comm = FakeComm::new();
        assert!(!running(CID).holds(&comm).unwrap());
        assert_eq!(comm.test_commands().len(), 2);
    }

    #[test]
    fn dual_check_surfaces_a_lost_connection() {
        let check = exists(CID);
        let comm = FakeComm::new().unreachable(&check.short);
        let err = check.holds(&comm).unwrap_err();
        assert!(matches!(err, ProvisionError::ConnectionFailed { .. }));
        // The full form is not consulted once the transport has failed.
        assert_eq!(comm.test_commands(), vec![check.short.clone()]);
    }
}
