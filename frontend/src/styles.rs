pub const CONTAINER: &str = "min-h-screen w-full bg-gradient-to-br from-[#1a1a1a] to-[#2d2d2d] text-white px-4 sm:px-6 lg:px-8 py-8";
pub const CARD: &str = "bg-[#333] rounded-2xl shadow-xl p-6 sm:p-8 max-w-2xl mx-auto border border-gray-700";
pub const TEXT_H1: &str = "text-3xl font-bold mb-6 text-center text-[#FFFF00]";
pub const TEXT_SMALL: &str = "text-sm text-gray-400";
pub const TEXT_ERROR: &str = "text-sm text-red-400";
pub const TEXT_SUCCESS: &str = "text-sm text-green-400";

// Mode selector
pub const MODE_GROUP: &str = "flex justify-center gap-2 mb-6";
pub const MODE_OPTION: &str = "px-4 py-2 rounded-full border-2 border-gray-600 cursor-pointer select-none transition-colors duration-200 hover:border-[#FFFF00]";
pub const MODE_OPTION_ACTIVE: &str = "px-4 py-2 rounded-full border-2 border-[#FFFF00] bg-[#FFFF00] text-black font-bold cursor-pointer select-none";
pub const MODE_OPTION_DISABLED: &str = "px-4 py-2 rounded-full border-2 border-gray-700 text-gray-500 cursor-not-allowed select-none";

// Result modal
pub const MODAL_OVERLAY: &str = "fixed inset-0 z-50 flex items-center justify-center bg-black/70 transition-opacity duration-300";
pub const RESULT_CARD: &str = "bg-[#2a2a2a] rounded-2xl shadow-2xl p-8 max-w-sm w-full mx-4 text-center border-2 border-[#FFFF00]";
pub const RESULT_IMAGE: &str = "mx-auto mb-4 max-h-40 object-contain";
pub const RESULT_TEXT: &str = "text-3xl font-bold text-[#FFFF00] mb-6";
pub const RESULT_LINKS: &str = "flex justify-center gap-3 mb-4";
pub const RESULT_LINK: &str = "flex items-center gap-2 px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-white transition-colors duration-200";
pub const BUTTON_ANNOUNCE: &str = "w-full py-3 px-4 font-semibold text-black bg-[#FFFF00] hover:bg-yellow-300 rounded-lg transition-all duration-200";

// Code entry
pub const CODE_CARD: &str = "bg-[#2a2a2a] rounded-2xl shadow-2xl p-6 max-w-md w-full mx-4 text-center";
pub const CODE_ROW: &str = "flex justify-center gap-2 my-4";
pub const CODE_INPUT: &str = "w-12 h-14 text-center text-2xl font-bold rounded border-2 border-gray-600 bg-gray-900 text-white focus:outline-none focus:ring-2 focus:ring-[#FFFF00] focus:border-transparent";
pub const BUTTON_SECONDARY: &str = "inline-flex items-center justify-center px-4 py-2 rounded-lg font-medium border border-gray-600 text-white hover:bg-gray-800";
pub const LOADING_SPINNER: &str = "animate-spin h-5 w-5 text-[#FFFF00]";
