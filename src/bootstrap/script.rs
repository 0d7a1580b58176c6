// ABOUTME: Fixed remote commands used to check and install Docker.
// ABOUTME: Targets Debian-family hosts through apt and the upstream Docker repository.

/// Prints the installed Docker version; writes to stderr when Docker is absent.
pub const VERSION_CHECK: &str = "docker -v";

/// Oldest Docker release accepted without reinstalling.
pub const DEFAULT_MIN_VERSION: &str = "19.03";

/// Installation steps, run in order as one batch.
pub const INSTALL_DOCKER: &[&str] = &[
    "sudo apt-get update",
    "sudo apt-get install -y apt-transport-https ca-certificates curl gnupg-agent software-properties-common",
    "curl -fsSL https://download.docker.com/linux/debian/gpg | sudo apt-key add -",
    "sudo add-apt-repository \"deb [arch=amd64] https://download.docker.com/linux/debian $(lsb_release -cs) stable\"",
    "sudo apt-get update",
    "sudo apt-get install -y docker-ce docker-ce-cli containerd.io",
];

/// The install steps joined into a single shell line.
///
/// Steps are separated by `;`, so the batch exit status is that of the last step.
pub fn install_batch() -> String {
    INSTALL_DOCKER.join(";")
}

/// Command granting `user` access to the Docker socket.
pub fn add_user_to_group(user: &str) -> String {
    format!("sudo usermod -aG docker {}", user)
}
