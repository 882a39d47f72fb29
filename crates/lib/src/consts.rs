/// Name used for scratch directories and the jar manifest `Created-By` line.
pub const APP_NAME: &str = "l2dkit";

/// User-Agent sent with every download. Some hosts reject the default agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Cubism SDK for Native distribution.
pub const SDK_URL: &str = "https://cubism.live2d.com/sdk-native/bin/CubismSdkForNative-5-r.4.1.zip";

pub const GLES2_REGISTRY: &str = "https://raw.githubusercontent.com/KhronosGroup/OpenGL-Registry/main/api/GLES2";
pub const KHR_REGISTRY: &str = "https://raw.githubusercontent.com/KhronosGroup/EGL-Registry/main/api/KHR";
